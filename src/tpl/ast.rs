use crate::error::Error;
use std::sync::Arc;

/// A normalized property-access path, e.g. `a["b"][0]` becomes `["a", "b", "0"]`.
pub type Ref = Arc<[String]>;

/// A template split into literal text and placeholder expressions.
///
/// `strings[i]` is the text before `paths[i]`; the last string is the text
/// after the final placeholder, so there is always exactly one more string
/// than there are paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    pub(crate) strings: Vec<String>,
    pub(crate) paths: Vec<String>,
}

impl ParsedTemplate {
    /// Builds a template from already-separated parts, as a tagged call site
    /// supplies them. Path expressions are trimmed but not parsed here.
    ///
    /// ```
    /// use micromustache::ParsedTemplate;
    ///
    /// let parsed = ParsedTemplate::from_parts(["Hi ", "!"], ["user.name"]).unwrap();
    /// assert_eq!(parsed.paths(), ["user.name"]);
    /// assert!(ParsedTemplate::from_parts(["a"], ["b"]).is_err());
    /// ```
    pub fn from_parts<S, P>(
        strings: impl IntoIterator<Item = S>,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Self, Error>
    where
        S: Into<String>,
        P: AsRef<str>,
    {
        let strings: Vec<String> = strings.into_iter().map(Into::into).collect();
        let paths: Vec<String> = paths
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .collect();

        if strings.len() != paths.len() + 1 {
            return Err(Error::Type(format!(
                "expected {} literal strings for {} paths, got {}",
                paths.len() + 1,
                paths.len(),
                strings.len()
            )));
        }
        Ok(Self { strings, paths })
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// `true` when the template has no placeholders.
    pub fn is_static(&self) -> bool {
        self.paths.is_empty()
    }
}
