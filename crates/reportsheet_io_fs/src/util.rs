use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::spec::{EnumListPatternMode, ListFilesError};

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone)]
pub(crate) enum TypeListPatternSeq {
    Literal(Vec<String>),
    Glob(Vec<GlobMatcher>),
    Regex(Vec<Regex>),
}

impl TypeListPatternSeq {
    fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Literal(v) => v.iter().any(|p| value.contains(p.as_str())),
            Self::Glob(v) => v.iter().any(|p| p.is_match(value)),
            Self::Regex(v) => v.iter().any(|p| p.is_match(value)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SpecListPatterns {
    pub(crate) patterns_include_files: Option<TypeListPatternSeq>,
    pub(crate) patterns_exclude_files: Option<TypeListPatternSeq>,
}

impl SpecListPatterns {
    pub(crate) fn from_raw(
        patterns_include_files: Option<&[String]>,
        patterns_exclude_files: Option<&[String]>,
        rule_pattern: EnumListPatternMode,
    ) -> Result<Self, ListFilesError> {
        Ok(Self {
            patterns_include_files: _compile(patterns_include_files, rule_pattern)?,
            patterns_exclude_files: _compile(patterns_exclude_files, rule_pattern)?,
        })
    }

    /// Included when no include list or any include matches, and no exclude matches.
    pub(crate) fn should_keep(&self, value: &str) -> bool {
        let if_included = self
            .patterns_include_files
            .as_ref()
            .is_none_or(|patterns| patterns.is_match(value));
        let if_excluded = self
            .patterns_exclude_files
            .as_ref()
            .is_some_and(|patterns| patterns.is_match(value));
        if_included && !if_excluded
    }
}

fn _compile(
    patterns: Option<&[String]>,
    rule_pattern: EnumListPatternMode,
) -> Result<Option<TypeListPatternSeq>, ListFilesError> {
    let Some(patterns) = patterns else {
        return Ok(None);
    };
    if patterns.is_empty() {
        return Ok(None);
    }

    match rule_pattern {
        EnumListPatternMode::Literal => Ok(Some(TypeListPatternSeq::Literal(patterns.to_vec()))),
        EnumListPatternMode::Glob => {
            let mut l_glob = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let matcher = Glob::new(pattern)
                    .map_err(|e| {
                        ListFilesError::InvalidPattern(format!(
                            "Invalid pattern in include/exclude: {e}"
                        ))
                    })?
                    .compile_matcher();
                l_glob.push(matcher);
            }
            Ok(Some(TypeListPatternSeq::Glob(l_glob)))
        }
        EnumListPatternMode::Regex => {
            let mut l_regex = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                let regex = Regex::new(pattern).map_err(|e| {
                    ListFilesError::InvalidPattern(format!(
                        "Invalid pattern in include/exclude: {e}"
                    ))
                })?;
                l_regex.push(regex);
            }
            Ok(Some(TypeListPatternSeq::Regex(l_regex)))
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
