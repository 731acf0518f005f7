//! Rule set for VAHTI
//!
//! A rule is a pure predicate over an [`AlarmEvent`] plus a generator for the
//! [`DispatchAction`]s it wants when the predicate holds.
//!
//! # Evaluation
//!
//! ```text
//! AlarmEvent ──► rule 1 ──► rule 2 ──► ... ──► Vec<DispatchAction>
//!                (ascending priority, every matching rule fires)
//! ```
//!
//! Priority only decides the order in which rules are checked and therefore
//! the order of the resulting actions. It never short-circuits: an event that
//! is both critical and a fire gets the critical actions *and* the fire
//! notification.
//!
//! # Example
//!
//! ```ignore
//! use vahti_gateway::rules::{Actions, Rule, RuleSet};
//!
//! fn is_medical(event: &AlarmEvent) -> bool {
//!     event.event_type == EventType::Medical
//! }
//!
//! fn page_on_call(event: &AlarmEvent) -> Actions<'_> {
//!     Box::new(std::iter::once_with(move || {
//!         DispatchAction::new(&event.event_id, ActionTarget::InstantMessage, "medical")
//!     }))
//! }
//!
//! let mut rules = RuleSet::baseline();
//! rules.add(Rule::new("medical", 2, is_medical, page_on_call));
//! ```

mod baseline;

use crate::metrics::Metrics;
use std::fmt;
use tracing::{debug, info};
use vahti_core::{AlarmEvent, DispatchAction};

/// Lazily generated actions of one rule
pub type Actions<'a> = Box<dyn Iterator<Item = DispatchAction> + Send + 'a>;

/// Rule predicate, a pure function of the event
pub type Predicate = fn(&AlarmEvent) -> bool;

/// Action generator, must not depend on anything but the event
pub type Generate = for<'a> fn(&'a AlarmEvent) -> Actions<'a>;

/// One entry of the rule table
#[derive(Clone, Copy)]
pub struct Rule {
    name: &'static str,
    priority: u32,
    matches: Predicate,
    actions: Generate,
}

impl Rule {
    /// Create a rule. Lower `priority` is evaluated first.
    pub const fn new(name: &'static str, priority: u32, matches: Predicate, actions: Generate) -> Self {
        Self {
            name,
            priority,
            matches,
            actions,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Whether this rule applies to `event`
    pub fn matches(&self, event: &AlarmEvent) -> bool {
        (self.matches)(event)
    }

    /// Actions this rule produces for `event`
    pub fn actions<'a>(&self, event: &'a AlarmEvent) -> Actions<'a> {
        (self.actions)(event)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Ordered rule table
///
/// Rules are kept sorted by ascending priority; rules with equal priority keep
/// their insertion order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Rule set with the five baseline rules
    ///
    /// | priority | rule | fires on | actions |
    /// |---|---|---|---|
    /// | 1 | critical | severity critical | VMS, email, web client |
    /// | 2 | fire | type fire | instant message |
    /// | 2 | panic | type panic | instant message |
    /// | 3 | warning | severity warning | web client |
    /// | 4 | restore | type zone restore | web client (restore notice) |
    pub fn baseline() -> Self {
        let mut rules = Self::new();
        for rule in baseline::RULES {
            rules.add(rule);
        }
        info!(count = rules.len(), "Rule set initialized");
        rules
    }

    /// Add a rule at its priority position
    pub fn add(&mut self, rule: Rule) {
        let position = self
            .rules
            .partition_point(|existing| existing.priority <= rule.priority);
        self.rules.insert(position, rule);
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule against `event`
    ///
    /// Returns the actions of all matching rules, in rule order and, within a
    /// rule, in generation order. The event is only borrowed.
    pub fn evaluate(&self, event: &AlarmEvent) -> Vec<DispatchAction> {
        debug!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            severity = %event.severity,
            "Evaluating event"
        );

        let metrics = Metrics::get();
        let mut actions = Vec::new();
        let mut matched = 0usize;

        for rule in &self.rules {
            if !rule.matches(event) {
                continue;
            }

            let before = actions.len();
            actions.extend(rule.actions(event));
            matched += 1;

            if let Some(m) = metrics {
                m.record_rule_match(rule.name);
            }
            debug!(
                rule = rule.name,
                actions = actions.len() - before,
                "Rule matched"
            );
        }

        if matched == 0 {
            debug!(event_id = %event.event_id, "No matching rule");
        } else if actions.is_empty() {
            debug!(
                event_id = %event.event_id,
                rules = matched,
                "Rules matched but generated no actions"
            );
        } else {
            info!(
                event_id = %event.event_id,
                rules = matched,
                actions = actions.len(),
                "Actions generated"
            );
        }

        actions
    }
}
