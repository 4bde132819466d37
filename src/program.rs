//! Function definitions handed over by the external parser
//!
//! The parser turns source text into these shapes; this crate never sees
//! raw text. A [`SourceUnit`] is deserialized from JSON at the binary
//! boundary and is read-only afterwards.

use crate::error::{PathcastError, Result};
use crate::predicate::{Assignment, PredicateExpr};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type", default = "default_type_hint")]
    pub type_hint: String,
}

fn default_type_hint() -> String {
    "int".to_string()
}

impl Param {
    pub fn new(name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: type_hint.into(),
        }
    }

    /// `int` parameter
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, "int")
    }
}

/// Name and ordered parameter list of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Parameter names in declaration order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    /// Check if `name` is one of the parameters
    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }

    /// Every parameter set to zero
    pub fn baseline(&self) -> Assignment {
        self.param_names().map(|name| (name.to_string(), 0)).collect()
    }

    /// Reject duplicate parameter names
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in self.param_names() {
            if !seen.insert(name) {
                return Err(PathcastError::DuplicateParam {
                    function: self.name.clone(),
                    param: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Statement tree of a function body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// `if (cond) { then } else { otherwise }`; a missing else is `None`
    If {
        cond: PredicateExpr,
        #[serde(default)]
        then: Vec<Stmt>,
        #[serde(default, rename = "else")]
        otherwise: Option<Vec<Stmt>>,
    },
    /// `return value;`
    Return {
        #[serde(default)]
        value: Option<String>,
    },
    /// Any other statement, kept as display text
    Simple { text: String },
}

impl Stmt {
    pub fn if_else(cond: PredicateExpr, then: Vec<Stmt>, otherwise: Vec<Stmt>) -> Self {
        Stmt::If {
            cond,
            then,
            otherwise: Some(otherwise),
        }
    }

    pub fn if_then(cond: PredicateExpr, then: Vec<Stmt>) -> Self {
        Stmt::If {
            cond,
            then,
            otherwise: None,
        }
    }

    pub fn ret(value: impl Into<String>) -> Self {
        Stmt::Return {
            value: Some(value.into()),
        }
    }

    pub fn simple(text: impl Into<String>) -> Self {
        Stmt::Simple { text: text.into() }
    }
}

/// A function: signature plus body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    #[serde(flatten)]
    pub signature: FunctionSignature,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

impl FunctionDef {
    pub fn new(signature: FunctionSignature, body: Vec<Stmt>) -> Self {
        Self { signature, body }
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    /// Branch conditions of the body in source order
    pub fn condition_roots(&self) -> Vec<&PredicateExpr> {
        collect_condition_roots(&self.body)
    }
}

/// Collect the condition of every `if`, pre-order
///
/// An outer condition comes before the conditions nested in its THEN arm,
/// which come before those in its ELSE arm.
pub fn collect_condition_roots(body: &[Stmt]) -> Vec<&PredicateExpr> {
    let mut roots = Vec::new();
    visit_conditions(body, &mut roots);
    roots
}

fn visit_conditions<'a>(body: &'a [Stmt], roots: &mut Vec<&'a PredicateExpr>) {
    for stmt in body {
        if let Stmt::If {
            cond,
            then,
            otherwise,
        } = stmt
        {
            roots.push(cond);
            visit_conditions(then, roots);
            if let Some(otherwise) = otherwise {
                visit_conditions(otherwise, roots);
            }
        }
    }
}

/// All functions discovered in one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    #[serde(default)]
    pub functions: Vec<FunctionDef>,
}

impl SourceUnit {
    /// Parse a unit from its JSON form and validate every signature
    pub fn from_json(json: &str) -> Result<Self> {
        let unit: SourceUnit = serde_json::from_str(json)?;
        for function in &unit.functions {
            function.signature.validate()?;
        }
        tracing::debug!(functions = unit.functions.len(), "loaded source unit");
        Ok(unit)
    }

    /// Read and parse a unit from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| PathcastError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Look up a function by name
    pub fn function(&self, name: &str) -> Result<&FunctionDef> {
        self.functions
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| PathcastError::FunctionNotFound(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
