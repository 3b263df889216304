use ahash::HashMap;

/// Names and durations of the animation tracks of a scene, addressed by
/// logical index
#[derive(Clone, Debug, Default)]
pub struct AnimationTracks {
    names: Vec<String>,
    durations: Vec<f32>,
    lookup: HashMap<String, usize>,
}

impl AnimationTracks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a track and returns its index. If the name is already used the
    /// earlier track keeps it for lookups by name.
    pub fn push(&mut self, name: impl Into<String>, duration: f32) -> usize {
        let name = name.into();
        let index = self.names.len();
        self.lookup.entry(name.clone()).or_insert(index);
        self.names.push(name);
        self.durations.push(duration);
        index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// Duration in seconds, 0 for an unknown track
    #[must_use]
    pub fn duration(&self, index: usize) -> f32 {
        self.durations.get(index).copied().unwrap_or(0.0f32)
    }

    #[must_use]
    pub fn duration_by_name(&self, name: &str) -> f32 {
        self.index_of(name).map_or(0.0f32, |i| self.duration(i))
    }
}

impl<S: Into<String>> FromIterator<(S, f32)> for AnimationTracks {
    fn from_iter<I: IntoIterator<Item = (S, f32)>>(iter: I) -> Self {
        let mut tracks = Self::new();
        for (name, duration) in iter {
            tracks.push(name, duration);
        }
        tracks
    }
}

#[cfg(test)]
mod tests {
    use super::AnimationTracks;

    #[test]
    fn lookup() {
        let tracks: AnimationTracks =
            [("walk", 2.0f32), ("run", 1.5), ("walk", 9.0)].into_iter().collect();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks.index_of("run"), Some(1));
        assert_eq!(tracks.index_of("walk"), Some(0));
        assert_eq!(tracks.index_of("jump"), None);
        assert!((tracks.duration_by_name("run") - 1.5).abs() < f32::EPSILON);
        assert!(tracks.duration(99).abs() < f32::EPSILON);
        assert_eq!(tracks.names().collect::<Vec<_>>(), vec!["walk", "run", "walk"]);
    }
}
