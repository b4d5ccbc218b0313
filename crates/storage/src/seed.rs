//! Demo rule set loaded when the store is seeded at startup

use rule_model::{AggregateFunction, LimitOperator, Rule, RuleState};

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Sample rules covering both lifecycle states and several aggregates
pub fn demo_rules() -> Vec<Rule> {
    vec![
        Rule {
            rule_id: "rule_001".to_string(),
            rule_state: RuleState::Active,
            grouping_key_names: keys(&["customer_id", "account_type"]),
            unique: keys(&["transaction_id"]),
            aggregate_field_name: "transaction_amount".to_string(),
            aggregate_function_type: AggregateFunction::Sum,
            limit_operator_type: LimitOperator::Greater,
            limit: 10000.0,
            window_minutes: 60,
        },
        Rule {
            rule_id: "rule_002".to_string(),
            rule_state: RuleState::Pause,
            grouping_key_names: keys(&["customer_id"]),
            unique: keys(&["transaction_id", "merchant_id"]),
            aggregate_field_name: "transaction_count".to_string(),
            aggregate_function_type: AggregateFunction::Sum,
            limit_operator_type: LimitOperator::GreaterOrEqual,
            limit: 5.0,
            window_minutes: 30,
        },
        Rule {
            rule_id: "rule_003".to_string(),
            rule_state: RuleState::Active,
            grouping_key_names: keys(&["account_id", "country_code"]),
            unique: keys(&["transaction_id"]),
            aggregate_field_name: "withdrawal_amount".to_string(),
            aggregate_function_type: AggregateFunction::Max,
            limit_operator_type: LimitOperator::Greater,
            limit: 50000.0,
            window_minutes: 1440,
        },
    ]
}
