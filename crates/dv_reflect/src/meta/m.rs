//! Standard meta values read by property panels and serializers.

/// Human readable label shown instead of the field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayName(pub &'static str);

/// Help text shown when hovering a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tooltip(pub &'static str);

/// The field can be read but never written through reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOnly;

/// The field is not shown in editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hidden;

/// Editors group fields with the same group name together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group(pub &'static str);

/// Valid numeric range of a field and the step of its editor widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Checks `min <= value <= max`.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Clamps `value` into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::Range;

    #[test]
    fn range_clamps() {
        let range = Range::new(-1.0, 1.0, 0.1);
        assert!(range.contains(0.5));
        assert!(!range.contains(2.0));
        assert_eq!(range.clamp(5.0), 1.0);
        assert_eq!(range.clamp(-5.0), -1.0);
    }
}
