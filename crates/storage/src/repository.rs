//! Rule Store Implementation

use crate::id::IdStrategy;
use crate::snapshot::RuleSnapshot;
use crate::StorageError;
use chrono::Utc;
use rule_model::{validate_input, Rule, RuleInput, RuleState};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Filter applied when listing rules
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleFilter {
    /// Case-insensitive substring of `ruleId` or `aggregateFieldName`
    pub search: Option<String>,
    /// Exact lifecycle state
    pub state: Option<RuleState>,
}

impl RuleFilter {
    fn matches(&self, rule: &Rule) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                rule.rule_id.to_lowercase().contains(&term)
                    || rule.aggregate_field_name.to_lowercase().contains(&term)
            }
            _ => true,
        };

        matches_search && self.state.map_or(true, |state| rule.rule_state == state)
    }
}

/// Rule counts per lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSummary {
    pub total: usize,
    pub active: usize,
    pub paused: usize,
    pub deleted: usize,
}

/// Collection and id counter, always locked together
struct RuleTable {
    rules: Vec<Rule>,
    next_sequence: u64,
}

impl RuleTable {
    fn position(&self, rule_id: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.rule_id == rule_id)
    }

    fn next_id(&mut self, strategy: IdStrategy) -> String {
        loop {
            let candidate = strategy.candidate(self.next_sequence);
            self.next_sequence += 1;
            if self.position(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

/// Authoritative in-memory rule collection.
///
/// Every operation holds one lock for its whole duration, so writes never
/// interleave and `ruleId` stays unique.
pub struct RuleStore {
    table: Mutex<RuleTable>,
    id_strategy: IdStrategy,
}

impl RuleStore {
    /// Create an empty store with sequential ids
    pub fn new() -> Self {
        Self::with_strategy(IdStrategy::default())
    }

    /// Create an empty store with the given id strategy
    pub fn with_strategy(id_strategy: IdStrategy) -> Self {
        info!("Creating in-memory rule store ({:?} ids)", id_strategy);
        Self {
            table: Mutex::new(RuleTable {
                rules: Vec::new(),
                next_sequence: 1,
            }),
            id_strategy,
        }
    }

    /// Create a store pre-loaded with rules. Each rule goes through the
    /// regular upsert path, so invalid seed data is rejected.
    pub fn with_rules(id_strategy: IdStrategy, rules: Vec<Rule>) -> Result<Self, StorageError> {
        let store = Self::with_strategy(id_strategy);
        for rule in rules {
            store.upsert(RuleInput::from(rule))?;
        }
        info!("Seeded rule store with {} rules", store.len()?);
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, RuleTable>, StorageError> {
        self.table
            .lock()
            .map_err(|e| StorageError::LockError(e.to_string()))
    }

    /// All rules in insertion order
    pub fn list(&self) -> Result<Vec<Rule>, StorageError> {
        let table = self.lock()?;
        debug!("Listing {} rules", table.rules.len());
        Ok(table.rules.clone())
    }

    /// Rules matching a filter, in insertion order
    pub fn search(&self, filter: &RuleFilter) -> Result<Vec<Rule>, StorageError> {
        let table = self.lock()?;
        Ok(table
            .rules
            .iter()
            .filter(|rule| filter.matches(rule))
            .cloned()
            .collect())
    }

    /// Look up a single rule
    pub fn get(&self, rule_id: &str) -> Result<Rule, StorageError> {
        let table = self.lock()?;
        let rule_id = rule_id.trim();
        table
            .position(rule_id)
            .map(|index| table.rules[index].clone())
            .ok_or_else(|| StorageError::NotFound(rule_id.to_string()))
    }

    /// Create or replace a rule.
    ///
    /// A blank or absent id gets a freshly generated one. An id naming an
    /// existing rule replaces it wholesale in place; any other id is inserted
    /// as given. The store is untouched when validation fails.
    pub fn upsert(&self, input: RuleInput) -> Result<Rule, StorageError> {
        let requested = input.requested_id().map(str::to_string);
        let input = validate_input(input)?;
        let mut table = self.lock()?;

        match requested {
            Some(rule_id) => {
                let rule = Rule::from_input(rule_id, input);
                if let Some(index) = table.position(&rule.rule_id) {
                    table.rules[index] = rule.clone();
                    info!("Replaced rule {}: {}", rule.rule_id, rule.describe());
                } else {
                    table.rules.push(rule.clone());
                    info!("Inserted rule {}: {}", rule.rule_id, rule.describe());
                }
                Ok(rule)
            }
            None => {
                let rule_id = table.next_id(self.id_strategy);
                let rule = Rule::from_input(rule_id, input);
                table.rules.push(rule.clone());
                info!("Created rule {}: {}", rule.rule_id, rule.describe());
                Ok(rule)
            }
        }
    }

    /// Replace an existing rule; never creates one
    pub fn replace(&self, input: RuleInput) -> Result<Rule, StorageError> {
        let rule_id = input
            .requested_id()
            .map(str::to_string)
            .ok_or(rule_model::ValidationError::MissingField("ruleId"))?;
        let input = validate_input(input)?;
        let mut table = self.lock()?;

        let index = table
            .position(&rule_id)
            .ok_or_else(|| StorageError::NotFound(rule_id.clone()))?;
        let rule = Rule::from_input(rule_id, input);
        table.rules[index] = rule.clone();
        info!("Replaced rule {}: {}", rule.rule_id, rule.describe());
        Ok(rule)
    }

    /// Physically remove a rule. Fails with `NotFound` when it is absent.
    pub fn delete(&self, rule_id: &str) -> Result<(), StorageError> {
        let mut table = self.lock()?;
        let rule_id = rule_id.trim();
        let index = table
            .position(rule_id)
            .ok_or_else(|| StorageError::NotFound(rule_id.to_string()))?;
        table.rules.remove(index);
        info!("Deleted rule {}", rule_id);
        Ok(())
    }

    /// Remove every rule, returning how many were removed
    pub fn clear(&self) -> Result<usize, StorageError> {
        let mut table = self.lock()?;
        let removed = table.rules.len();
        table.rules.clear();
        info!("Cleared rule store ({} rules removed)", removed);
        Ok(removed)
    }

    /// Serialize the whole collection without modifying it
    pub fn export_all(&self) -> Result<RuleSnapshot, StorageError> {
        let table = self.lock()?;
        let snapshot = RuleSnapshot::capture(&table.rules, Utc::now())?;
        info!("Exported {} rules as {}", snapshot.rule_count, snapshot.file_name);
        Ok(snapshot)
    }

    /// Counts per lifecycle state
    pub fn summary(&self) -> Result<RuleSummary, StorageError> {
        let table = self.lock()?;
        let mut summary = RuleSummary {
            total: table.rules.len(),
            ..Default::default()
        };
        for rule in &table.rules {
            match rule.rule_state {
                RuleState::Active => summary.active += 1,
                RuleState::Pause => summary.paused += 1,
                RuleState::Delete => summary.deleted += 1,
                RuleState::Control => {}
            }
        }
        Ok(summary)
    }

    /// Number of stored rules
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.rules.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}
