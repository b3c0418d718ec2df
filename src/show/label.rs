use crate::error::ConfigError;

/// Text drawn at a fixed point above an exploded firework.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Round-robin over a fixed, non-empty list of names.
#[derive(Debug, Clone)]
pub struct LabelRotation {
    names: Vec<String>,
    cursor: usize,
}

impl LabelRotation {
    pub fn new(names: Vec<String>) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::EmptyLabels);
        }
        Ok(LabelRotation { names, cursor: 0 })
    }

    /// Return the name under the cursor and advance it, wrapping at the end.
    pub fn next_name(&mut self) -> &str {
        let i = self.cursor;
        self.cursor = (self.cursor + 1) % self.names.len();
        &self.names[i]
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> LabelRotation {
        LabelRotation::new(vec!["A".into(), "B".into(), "C".into()]).unwrap()
    }

    #[test]
    fn test_fourth_assignment_wraps() {
        let mut labels = abc();
        assert_eq!(labels.next_name(), "A");
        assert_eq!(labels.next_name(), "B");
        assert_eq!(labels.next_name(), "C");
        assert_eq!(labels.next_name(), "A");
        assert_eq!(labels.cursor(), 1);
    }

    #[test]
    fn test_single_name_repeats() {
        let mut labels = LabelRotation::new(vec!["solo".into()]).unwrap();
        for _ in 0..3 {
            assert_eq!(labels.next_name(), "solo");
        }
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(matches!(LabelRotation::new(Vec::new()), Err(ConfigError::EmptyLabels)));
    }
}
