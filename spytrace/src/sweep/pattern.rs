use core::{convert::Infallible, str::FromStr};

/// Shell-style file name pattern: `*` matches any run of characters, `?` exactly one.
///
/// A leading `.` in a name only matches a literal `.` in the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern(String);

impl Pattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, name: &str) -> bool {
        if name.starts_with('.') && !self.0.starts_with('.') {
            return false;
        }
        let pattern: Vec<char> = self.0.chars().collect();
        let name: Vec<char> = name.chars().collect();
        let (mut p, mut n) = (0, 0);
        // position of the last `*` and the name index it is currently absorbing up to
        let mut star: Option<(usize, usize)> = None;
        while n < name.len() {
            match pattern.get(p) {
                Some('*') => {
                    star = Some((p, n));
                    p += 1;
                }
                Some(&c) if c == '?' || c == name[n] => {
                    p += 1;
                    n += 1;
                }
                _ => match star {
                    Some((star_p, star_n)) => {
                        star = Some((star_p, star_n + 1));
                        p = star_p + 1;
                        n = star_n + 1;
                    }
                    None => return false,
                },
            }
        }
        pattern[p..].iter().all(|&c| c == '*')
    }
}

impl FromStr for Pattern {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    #[test]
    fn monitor_files() {
        let fpemon = Pattern::new("*.fpemon");
        assert!(fpemon.matches("__lulesh.1712345678.4242.individual.fpemon"));
        assert!(!fpemon.matches(".fpemon"));
        assert!(!fpemon.matches(".hidden.fpemon"));
        assert!(Pattern::new(".*.fpemon").matches(".hidden.fpemon"));
        assert!(!fpemon.matches("trace.fpemon.bak"));
        assert!(!fpemon.matches("fpemon"));
    }

    #[test]
    fn program_outputs() {
        let yaml = Pattern::new("*miniaero*.yaml");
        assert!(yaml.matches("miniaero.yaml"));
        assert!(yaml.matches("run-miniaero-3.yaml"));
        assert!(!yaml.matches("miniaero.yml"));
        let rank = Pattern::new("out.?.txt");
        assert!(rank.matches("out.7.txt"));
        assert!(!rank.matches("out.12.txt"));
    }

    #[test]
    fn literal_and_degenerate_patterns() {
        assert!(Pattern::new("result.dat").matches("result.dat"));
        assert!(!Pattern::new("result.dat").matches("result.data"));
        assert!(Pattern::new("*").matches("anything"));
        assert!(!Pattern::new("*").matches(".profile"));
        assert!(!Pattern::new("?profile").matches(".profile"));
        assert!(Pattern::new("**").matches(""));
        assert!(!Pattern::new("").matches("x"));
        assert!(Pattern::new("").matches(""));
    }
}
