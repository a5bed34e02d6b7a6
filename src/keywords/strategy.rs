//! Generation strategy interfaces
//!
//! Strategies are interchangeable objects chosen at construction time. They
//! never fail loudly: an unavailable model yields empty output and the
//! caller decides what that means.

/// Turns keywords into text bounded by a length range
pub trait TextStrategy: Send + Sync {
    /// Strategy name for logs
    fn name(&self) -> &'static str;

    /// Generate text from `keywords`; empty when the model is unavailable
    fn generate(&self, keywords: &[String], min_length: usize, max_length: usize) -> String;
}

/// Expands a keyword list into `count` new keywords
pub trait KeywordExpander: Send + Sync {
    fn generate_keywords(&self, current: &[String], count: usize) -> Vec<String>;
}

/// Any text strategy expands keywords by splitting its output into words
impl<T: TextStrategy + ?Sized> KeywordExpander for T {
    fn generate_keywords(&self, current: &[String], count: usize) -> Vec<String> {
        self.generate(current, count, count)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl TextStrategy for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn generate(&self, keywords: &[String], _min: usize, max: usize) -> String {
            keywords
                .iter()
                .take(max)
                .cloned()
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    #[test]
    fn test_text_strategy_expands_keywords() {
        let current = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(Echo.generate_keywords(&current, 2), vec!["a", "b"]);
    }

    #[test]
    fn test_boxed_expander() {
        let expander: Box<dyn KeywordExpander> = Box::new(Echo);
        assert!(expander.generate_keywords(&[], 3).is_empty());
    }
}
