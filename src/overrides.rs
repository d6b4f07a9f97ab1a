//! Name-based rules: the interactivity heuristic and per-design layout overrides.
//!
//! Rules are ordered and come from configuration, so design-specific patches
//! never leak into the classifier or the geometry translator.

use regex::{Regex, RegexSet};

use crate::config::{Config, MatchKind, OverrideAction, OverrideRule};
use crate::types::{DesignNode, TextAlignHorizontal, TextAlignVertical, Trigger};
use crate::{CompileError, Result};

#[derive(Debug, Clone)]
enum NameMatcher {
    Exact(String),
    Contains(String),
    Regex(Regex),
}

impl NameMatcher {
    fn compile(rule: &OverrideRule) -> Result<Self> {
        Ok(match rule.match_kind {
            MatchKind::Exact => NameMatcher::Exact(rule.name.clone()),
            MatchKind::Contains => NameMatcher::Contains(rule.name.clone()),
            MatchKind::Regex => NameMatcher::Regex(Regex::new(&rule.name).map_err(|e| {
                CompileError::Config(format!("invalid override pattern '{}': {}", rule.name, e))
            })?),
        })
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Exact(n) => name == n,
            NameMatcher::Contains(n) => name.contains(n.as_str()),
            NameMatcher::Regex(re) => re.is_match(name),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    matcher: NameMatcher,
    action: OverrideAction,
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    flatten_marker: String,
    interactive: RegexSet,
    rules: Vec<CompiledRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        // The default patterns are static and known to compile.
        Self::from_config(&Config::default()).unwrap_or_else(|_| Self {
            flatten_marker: String::new(),
            interactive: RegexSet::empty(),
            rules: Vec::new(),
        })
    }
}

impl RuleSet {
    pub fn from_config(config: &Config) -> Result<Self> {
        let interactive = RegexSet::new(&config.classification.interactive_patterns)
            .map_err(|e| CompileError::Config(format!("invalid interactive pattern: {e}")))?;
        let rules = config
            .overrides
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    matcher: NameMatcher::compile(rule)?,
                    action: rule.action,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            flatten_marker: config.classification.flatten_marker.clone(),
            interactive,
            rules,
        })
    }

    fn has_action(&self, name: &str, action: OverrideAction) -> bool {
        self.rules
            .iter()
            .any(|r| r.action == action && r.matcher.matches(name))
    }

    pub fn is_flattened(&self, node: &DesignNode) -> bool {
        (!self.flatten_marker.is_empty() && node.name.contains(&self.flatten_marker))
            || self.has_action(&node.name, OverrideAction::Flatten)
    }

    /// Click-target heuristic: interactive name, explicit rule, or a press reaction.
    pub fn is_interactive(&self, node: &DesignNode) -> bool {
        self.interactive.is_match(&node.name)
            || self.has_action(&node.name, OverrideAction::Interactive)
            || node
                .reactions
                .iter()
                .any(|r| matches!(r.trigger, Trigger::OnClick | Trigger::OnPress))
    }

    pub fn forces_stretch(&self, node: &DesignNode) -> bool {
        self.has_action(&node.name, OverrideAction::Stretch)
    }

    pub fn centers_text_children(&self, node: &DesignNode) -> bool {
        self.has_action(&node.name, OverrideAction::CenterText)
    }

    pub fn dedupes_text_children(&self, node: &DesignNode) -> bool {
        self.has_action(&node.name, OverrideAction::DedupeTextChildren)
    }

    /// Structural rewrites that must happen before any other pass.
    pub fn apply_structural(&self, node: &mut DesignNode) {
        if self.rules.is_empty() {
            return;
        }
        let dedupe = self.dedupes_text_children(node);
        let center = self.centers_text_children(node);
        if let Some(children) = node.children_mut() {
            if dedupe {
                let mut seen: Vec<String> = Vec::new();
                let before = children.len();
                children.retain(|child| match child.text() {
                    Some(text) if seen.contains(&text.characters) => false,
                    Some(text) => {
                        seen.push(text.characters.clone());
                        true
                    }
                    None => true,
                });
                if children.len() != before {
                    tracing::debug!(
                        removed = before - children.len(),
                        "dropped duplicate text children under override"
                    );
                }
            }
            for child in children.iter_mut() {
                if center {
                    if let Some(text) = child.text_mut() {
                        text.style.text_align_horizontal = TextAlignHorizontal::Center;
                        text.style.text_align_vertical = TextAlignVertical::Center;
                    }
                }
                self.apply_structural(child);
            }
        }
    }
}
