use crate::display::Rotation;

/// Driver configuration.
///
/// Keep this minimal; every field maps to a behavior the core actually has.
#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    /// Primary layer rotation. Replaces the display's reported rotation when set.
    pub primary_rotation: Option<Rotation>,

    /// Most items one BatchBlit call may draw. `None` means unlimited.
    ///
    /// Items past the limit are left to the caller, which learns how many
    /// were drawn from the returned count.
    pub max_batch_blits: Option<usize>,
}
