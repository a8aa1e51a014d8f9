//! Rule catalog and registry.

use std::collections::HashSet;

use thiserror::Error;

use crate::config::Config;
use crate::syntax::NodeRef;

use super::context::FileContext;
use super::types::{Category, RuleResult};
use super::{design, practices, semantic};

/// Every rule the engine knows, in canonical evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    ComplexMethod,
    FeatureEnvy,
    UtilityClass,
    TooManyMethods,
    TooManyFields,
    SwitchDensity,
    ExcessiveParameterList,
    ExcessiveImports,
    CyclomaticComplexity,
    PrivateConstructorsNotFinal,
    UncheckedExceptionsInSignature,
    RawExceptionThrown,
    NullPointerThrown,
    NestedIf,
    ReassignedCatchVariable,
    ReassignedLoopVariable,
    ReassignedParameter,
    ResultSetNotChecked,
    ExpensiveLogStatement,
    LiteralLastComparison,
    ImplicitFunctionalInterface,
    UnusedLocalVariable,
}

impl Rule {
    pub const ALL: [Rule; 22] = [
        Rule::ComplexMethod,
        Rule::FeatureEnvy,
        Rule::UtilityClass,
        Rule::TooManyMethods,
        Rule::TooManyFields,
        Rule::SwitchDensity,
        Rule::ExcessiveParameterList,
        Rule::ExcessiveImports,
        Rule::CyclomaticComplexity,
        Rule::PrivateConstructorsNotFinal,
        Rule::UncheckedExceptionsInSignature,
        Rule::RawExceptionThrown,
        Rule::NullPointerThrown,
        Rule::NestedIf,
        Rule::ReassignedCatchVariable,
        Rule::ReassignedLoopVariable,
        Rule::ReassignedParameter,
        Rule::ResultSetNotChecked,
        Rule::ExpensiveLogStatement,
        Rule::LiteralLastComparison,
        Rule::ImplicitFunctionalInterface,
        Rule::UnusedLocalVariable,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Rule::ComplexMethod => "CM",
            Rule::FeatureEnvy => "FE",
            Rule::UtilityClass => "UTD",
            Rule::TooManyMethods => "TMM",
            Rule::TooManyFields => "TMF",
            Rule::SwitchDensity => "SWD",
            Rule::ExcessiveParameterList => "EXP",
            Rule::ExcessiveImports => "EXI",
            Rule::CyclomaticComplexity => "CYC",
            Rule::PrivateConstructorsNotFinal => "PRV",
            Rule::UncheckedExceptionsInSignature => "UCD",
            Rule::RawExceptionThrown => "RWD",
            Rule::NullPointerThrown => "NPD",
            Rule::NestedIf => "NED",
            Rule::ReassignedCatchVariable => "RCV",
            Rule::ReassignedLoopVariable => "RLV",
            Rule::ReassignedParameter => "RP",
            Rule::ResultSetNotChecked => "RSC",
            Rule::ExpensiveLogStatement => "ELS",
            Rule::LiteralLastComparison => "LFSC",
            Rule::ImplicitFunctionalInterface => "IFI",
            Rule::UnusedLocalVariable => "ULV",
        }
    }

    /// Human-readable smell type, as it appears in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Rule::ComplexMethod => "Complex Method",
            Rule::FeatureEnvy => "Feature Envy",
            Rule::UtilityClass => "Utility Class",
            Rule::TooManyMethods => "Too Many Methods",
            Rule::TooManyFields => "Too Many Fields",
            Rule::SwitchDensity => "High Switch Density",
            Rule::ExcessiveParameterList => "Excessive Parameter List",
            Rule::ExcessiveImports => "Excessive Imports",
            Rule::CyclomaticComplexity => "High Cyclomatic Complexity (Method)",
            Rule::PrivateConstructorsNotFinal => {
                "Class With Only Private Constructors Should Be Final"
            }
            Rule::UncheckedExceptionsInSignature => "Unchecked Exceptions In Signatures",
            Rule::RawExceptionThrown => "Throwing Raw Exception Types",
            Rule::NullPointerThrown => "Throwing NullPointerException",
            Rule::NestedIf => "Nested If Statements",
            Rule::ReassignedCatchVariable => "Reassigning Catch Variable",
            Rule::ReassignedLoopVariable => "Reassigning Loop Variable",
            Rule::ReassignedParameter => "Reassigning Parameter",
            Rule::ResultSetNotChecked => "ResultSet Navigation Not Checked",
            Rule::ExpensiveLogStatement => "Expensive Log Statement",
            Rule::LiteralLastComparison => "Literal First In String Comparison",
            Rule::ImplicitFunctionalInterface => "Implicit Functional Interface",
            Rule::UnusedLocalVariable => "Unused Local Variable",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Rule::ComplexMethod | Rule::FeatureEnvy => Category::SemanticBased,
            Rule::UtilityClass
            | Rule::TooManyMethods
            | Rule::TooManyFields
            | Rule::SwitchDensity
            | Rule::ExcessiveParameterList
            | Rule::ExcessiveImports
            | Rule::CyclomaticComplexity
            | Rule::PrivateConstructorsNotFinal
            | Rule::UncheckedExceptionsInSignature
            | Rule::RawExceptionThrown
            | Rule::NullPointerThrown
            | Rule::NestedIf => Category::Design,
            Rule::ReassignedCatchVariable
            | Rule::ReassignedLoopVariable
            | Rule::ReassignedParameter
            | Rule::ResultSetNotChecked
            | Rule::ExpensiveLogStatement
            | Rule::LiteralLastComparison
            | Rule::ImplicitFunctionalInterface
            | Rule::UnusedLocalVariable => Category::BestPractices,
        }
    }

    pub fn default_weight(&self) -> u32 {
        match self {
            Rule::NullPointerThrown => 4,
            Rule::ComplexMethod
            | Rule::FeatureEnvy
            | Rule::TooManyMethods
            | Rule::TooManyFields
            | Rule::SwitchDensity
            | Rule::CyclomaticComplexity
            | Rule::UncheckedExceptionsInSignature => 3,
            Rule::ExcessiveParameterList
            | Rule::ExcessiveImports
            | Rule::RawExceptionThrown
            | Rule::NestedIf
            | Rule::ReassignedCatchVariable
            | Rule::ReassignedLoopVariable
            | Rule::ReassignedParameter
            | Rule::ResultSetNotChecked => 2,
            Rule::UtilityClass
            | Rule::PrivateConstructorsNotFinal
            | Rule::ExpensiveLogStatement
            | Rule::LiteralLastComparison
            | Rule::ImplicitFunctionalInterface
            | Rule::UnusedLocalVariable => 1,
        }
    }

    /// Rules that run unless switched off.
    pub fn enabled_by_default(&self) -> bool {
        !matches!(self, Rule::ImplicitFunctionalInterface)
    }

    /// Whether the rule needs the classifier service.
    pub fn uses_classifier(&self) -> bool {
        matches!(self, Rule::ComplexMethod | Rule::FeatureEnvy)
    }

    pub fn from_code(code: &str) -> Option<Rule> {
        Rule::ALL
            .iter()
            .copied()
            .find(|r| r.code().eq_ignore_ascii_case(code))
    }

    /// Offer one node to the rule.
    pub fn evaluate(&self, node: NodeRef<'_>, ctx: &FileContext<'_>) -> RuleResult {
        match self {
            Rule::ComplexMethod => semantic::complex_method(node, ctx),
            Rule::FeatureEnvy => semantic::feature_envy(node, ctx),
            Rule::UtilityClass => design::utility_class(node, ctx),
            Rule::TooManyMethods => design::too_many_methods(node, ctx),
            Rule::TooManyFields => design::too_many_fields(node, ctx),
            Rule::SwitchDensity => design::high_switch_density(node, ctx),
            Rule::ExcessiveParameterList => design::excessive_parameter_list(node, ctx),
            Rule::ExcessiveImports => design::excessive_imports(node, ctx),
            Rule::CyclomaticComplexity => design::high_cyclomatic_complexity(node, ctx),
            Rule::PrivateConstructorsNotFinal => design::private_constructors_not_final(node, ctx),
            Rule::UncheckedExceptionsInSignature => design::unchecked_exception_declared(node, ctx),
            Rule::RawExceptionThrown => design::raw_exception_thrown(node, ctx),
            Rule::NullPointerThrown => design::null_pointer_thrown(node, ctx),
            Rule::NestedIf => design::nested_if_statements(node, ctx),
            Rule::ReassignedCatchVariable => practices::reassigned_catch_variable(node, ctx),
            Rule::ReassignedLoopVariable => practices::reassigned_loop_variable(node, ctx),
            Rule::ReassignedParameter => practices::reassigned_parameter(node, ctx),
            Rule::ResultSetNotChecked => practices::unchecked_navigation(node, ctx),
            Rule::ExpensiveLogStatement => practices::expensive_log_statement(node, ctx),
            Rule::LiteralLastComparison => practices::literal_last_comparison(node, ctx),
            Rule::ImplicitFunctionalInterface => {
                practices::implicit_functional_interface(node, ctx)
            }
            Rule::UnusedLocalVariable => practices::unused_local_variable(node, ctx),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("rule code {0} registered twice")]
    DuplicateCode(&'static str),
    #[error("unknown rule code {0:?}")]
    UnknownCode(String),
    #[error("weight of {0} must be >= 1")]
    InvalidWeight(String),
}

/// The enabled rules, in canonical order.
#[derive(Debug, Clone)]
pub struct Registry {
    rules: Vec<Rule>,
}

impl Registry {
    /// Rules enabled by `config`: the defaults, plus `enabled_rules`, minus
    /// `disabled_rules`.
    pub fn new(config: &Config) -> Result<Self, RegistryError> {
        for code in config
            .enabled_rules
            .iter()
            .chain(&config.disabled_rules)
            .chain(config.weights.keys())
        {
            if Rule::from_code(code).is_none() {
                return Err(RegistryError::UnknownCode(code.clone()));
            }
        }
        if let Some((code, _)) = config.weights.iter().find(|(_, w)| **w == 0) {
            return Err(RegistryError::InvalidWeight(code.clone()));
        }
        let rules = Rule::ALL
            .iter()
            .copied()
            .filter(|r| r.enabled_by_default() || config.is_enabled(r.code()))
            .filter(|r| !config.is_disabled(r.code()))
            .collect();
        Self::from_rules(rules)
    }

    /// Build from an explicit list, rejecting duplicate codes.
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.code()) {
                return Err(RegistryError::DuplicateCode(rule.code()));
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn contains(&self, rule: Rule) -> bool {
        self.rules.contains(&rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
