use super::{Display, Rotation};

/// Cached rotation and aspect correction of the primary display.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct DisplayCache {
    entry: Option<(Rotation, f32)>,
}

impl DisplayCache {
    /// Returns `(rotation, aspect)`, querying the display on first use.
    ///
    /// `rotation_override` replaces the display's own rotation when set.
    /// The aspect is `min(w, h) / max(w, h)` of the screen for 90°, else `1.0`.
    pub fn get(
        &mut self,
        display: &dyn Display,
        rotation_override: Option<Rotation>,
    ) -> (Rotation, f32) {
        if let Some(entry) = self.entry {
            return entry;
        }

        let rotation = rotation_override.unwrap_or_else(|| display.rotation());
        let aspect = if rotation == Rotation::Deg90 {
            let (w, h) = display.screen_size();
            let (w, h) = (w as f32, h as f32);
            if w.max(h) == 0.0 {
                1.0
            } else {
                w.min(h) / w.max(h)
            }
        } else {
            1.0
        };

        log::debug!("display rotation {}°, aspect {aspect}", rotation.degrees());

        self.entry = Some((rotation, aspect));
        (rotation, aspect)
    }

    /// Drops the cached values; the next `get` queries the display again.
    #[inline]
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    #[inline]
    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }
}
