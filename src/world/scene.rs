/// Top-level screen the game is showing.
///
/// Only `Playing` and `Dying` render the 3-D view; the rest are full-screen
/// graphics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scene {
    #[default]
    Title,
    Playing,
    /// Player just died; the view stays up under the blood overlay.
    Dying,
    Dead,
    Won,
    Credits,
}

impl Scene {
    #[inline]
    pub fn shows_world(self) -> bool {
        matches!(self, Scene::Playing | Scene::Dying)
    }

    /// Transition on the confirm / restart button.
    pub fn on_confirm(self) -> Scene {
        match self {
            Scene::Title | Scene::Dead => Scene::Playing,
            Scene::Won => Scene::Credits,
            Scene::Credits => Scene::Title,
            Scene::Playing | Scene::Dying => self,
        }
    }

    /// Transition once the blood overlay has covered the screen.
    pub fn on_death_overlay_full(self) -> Scene {
        match self {
            Scene::Dying => Scene::Dead,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_cycles_end_screens() {
        assert_eq!(Scene::Title.on_confirm(), Scene::Playing);
        assert_eq!(Scene::Won.on_confirm(), Scene::Credits);
        assert_eq!(Scene::Credits.on_confirm(), Scene::Title);
        assert_eq!(Scene::Playing.on_confirm(), Scene::Playing);
        assert_eq!(Scene::Dying.on_death_overlay_full(), Scene::Dead);
        assert_eq!(Scene::Dead.on_confirm(), Scene::Playing);
    }
}
