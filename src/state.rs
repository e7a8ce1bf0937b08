/// User-toggled flags shared by the interaction layer and the animation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppState {
    pub is_animating: bool,
    pub wireframe: bool,
    /// Index into [`crate::palette::SCHEMES`].
    pub color_scheme: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            is_animating: true,
            wireframe: false,
            color_scheme: 0,
        }
    }
}
