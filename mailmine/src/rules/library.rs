use super::RuleCompileError;
use super::builtin::builtin_definitions;
use super::types::{EntityCategory, RuleDefinition, VerifiedRule};
use regex::RegexBuilder;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Rule definitions keyed by category, in curated order within a category.
pub type RuleDefinitions = BTreeMap<EntityCategory, Vec<RuleDefinition>>;

/// Compiled program size limit per rule.
pub const RULE_SIZE_LIMIT: usize = 1 << 20;

/// Lazy DFA cache limit per rule.
pub const RULE_DFA_SIZE_LIMIT: usize = 2 << 20;

/// A loaded, read-only set of verified rules.
#[derive(Debug, Clone, Default)]
pub struct RuleLibrary {
    rules: Vec<VerifiedRule>,
    rejected: Vec<RuleCompileError>,
}

fn compile(category: EntityCategory, definition: RuleDefinition) -> Result<VerifiedRule, RuleCompileError> {
    if !(0.0..=1.0).contains(&definition.base_confidence) {
        return Err(RuleCompileError::InvalidConfidence {
            category: category.to_string(),
            label: definition.label,
            value: definition.base_confidence,
        });
    }

    let regex = RegexBuilder::new(&definition.regex)
        .size_limit(RULE_SIZE_LIMIT)
        .dfa_size_limit(RULE_DFA_SIZE_LIMIT)
        .build()
        .map_err(|e| RuleCompileError::InvalidRegex {
            category: category.to_string(),
            label: definition.label.clone(),
            reason: e.to_string(),
        })?;

    Ok(VerifiedRule {
        id: format!("{}:{}", category, definition.label),
        category,
        label: definition.label,
        regex,
        base_confidence: definition.base_confidence,
        context_keywords: definition
            .context_keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect(),
        examples: definition.examples,
    })
}

impl RuleLibrary {
    /// An empty library.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The curated built-in library.
    pub fn builtin() -> Self {
        Self::from_definitions(builtin_definitions())
    }

    /// Compile a set of definitions.
    ///
    /// Definitions that fail to compile are logged and kept in
    /// [`rejected`](Self::rejected); the rest of the library still loads.
    pub fn from_definitions(definitions: RuleDefinitions) -> Self {
        let mut library = Self::default();
        for (category, rules) in definitions {
            for definition in rules {
                match compile(category, definition) {
                    Ok(rule) => library.rules.push(rule),
                    Err(e) => {
                        warn!("Rejected rule: {}", e);
                        library.rejected.push(e);
                    }
                }
            }
        }
        debug!(
            rules = library.rules.len(),
            rejected = library.rejected.len(),
            "Compiled rule library"
        );
        library
    }

    /// Parse a JSON document keyed by category name.
    ///
    /// A malformed document is an error; an unknown category only rejects
    /// that category's rules.
    pub fn from_json_str(json: &str) -> Result<Self, RuleCompileError> {
        let raw: BTreeMap<String, Vec<RuleDefinition>> =
            serde_json::from_str(json).map_err(|e| RuleCompileError::Definition(e.to_string()))?;

        let mut definitions = RuleDefinitions::new();
        let mut unknown = Vec::new();
        for (name, rules) in raw {
            match name.parse::<EntityCategory>() {
                Ok(category) => definitions.entry(category).or_default().extend(rules),
                Err(e) => {
                    warn!("Rejected {} rule(s): {}", rules.len(), e);
                    unknown.push(RuleCompileError::Definition(e));
                }
            }
        }

        let mut library = Self::from_definitions(definitions);
        library.rejected.extend(unknown);
        Ok(library)
    }

    /// Load a JSON rule file.
    pub async fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, RuleCompileError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            RuleCompileError::Definition(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Append another library's rules, keeping category order.
    pub fn merge(&mut self, other: RuleLibrary) {
        self.rules.extend(other.rules);
        self.rejected.extend(other.rejected);
        // Stable: curated order within a category survives
        self.rules.sort_by_key(|rule| rule.category);
    }

    /// All rules, by category then curated order.
    pub fn rules(&self) -> &[VerifiedRule] {
        &self.rules
    }

    /// Definitions that failed to load.
    pub fn rejected(&self) -> &[RuleCompileError] {
        &self.rejected
    }

    /// Rules of one category, highest base confidence first.
    ///
    /// Ties keep curated order.
    pub fn lookup(&self, category: EntityCategory) -> Vec<&VerifiedRule> {
        let mut rules: Vec<&VerifiedRule> = self
            .rules
            .iter()
            .filter(|rule| rule.category == category)
            .collect();
        rules.sort_by(|a, b| b.base_confidence.total_cmp(&a.base_confidence));
        rules
    }

    /// Find a rule by its `category:label` id.
    pub fn get(&self, id: &str) -> Option<&VerifiedRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Categories with at least one rule.
    pub fn categories(&self) -> Vec<EntityCategory> {
        EntityCategory::ALL
            .into_iter()
            .filter(|category| self.rules.iter().any(|rule| rule.category == *category))
            .collect()
    }

    /// Export back to definitions.
    pub fn to_definitions(&self) -> RuleDefinitions {
        let mut definitions = RuleDefinitions::new();
        for rule in &self.rules {
            definitions
                .entry(rule.category)
                .or_default()
                .push(rule.to_definition());
        }
        definitions
    }

    /// Export as pretty JSON.
    pub fn to_json(&self) -> Result<String, RuleCompileError> {
        serde_json::to_string_pretty(&self.to_definitions())
            .map_err(|e| RuleCompileError::Definition(e.to_string()))
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the library has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
