//! Stored-procedure descriptors.

use joinery_core::{DialectExt, JoineryError, ParameterSet, Result, Statement};
use joinery_types::{Dialect, Value};

/// A stored procedure call whose result rows map into a DTO.
///
/// Argument names are used verbatim; they are not suffixed with a counter
/// the way predicate parameters are.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDescriptor {
    name: String,
    params: ParameterSet,
}

impl ProcedureDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParameterSet::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.bind(name, value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Renders the call in `dialect`'s procedure syntax. SQLite has no stored
    /// procedures and fails with [`JoineryError::DialectUnsupportedOperator`].
    pub fn render(&self, dialect: Dialect) -> Result<Statement> {
        let mut args = String::new();
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                args.push_str(", ");
            }
            dialect.write_placeholder(&param.name, &mut args);
        }

        let name = &self.name;
        let sql = match dialect {
            Dialect::SqlServer if args.is_empty() => format!("EXEC {name}"),
            Dialect::SqlServer => format!("EXEC {name} {args}"),
            Dialect::MySql => format!("CALL {name}({args})"),
            Dialect::Postgres => format!("SELECT * FROM {name}({args})"),
            Dialect::Oracle => format!("SELECT * FROM TABLE({name}({args}))"),
            Dialect::SqlLite => {
                return Err(JoineryError::DialectUnsupportedOperator {
                    operator: "stored procedure",
                    dialect,
                });
            }
        };
        Ok(Statement::raw(sql, self.params.clone(), dialect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ProcedureDescriptor {
        ProcedureDescriptor::new("GetOrders")
            .param("customer", 7)
            .param("status", "open")
    }

    #[test]
    fn renders_per_dialect() {
        let render = |dialect| descriptor().render(dialect).unwrap().sql;
        assert_eq!(render(Dialect::SqlServer), "EXEC GetOrders @customer, @status");
        assert_eq!(render(Dialect::MySql), "CALL GetOrders(@customer, @status)");
        assert_eq!(render(Dialect::Postgres), "SELECT * FROM GetOrders(@customer, @status)");
        assert_eq!(
            render(Dialect::Oracle),
            "SELECT * FROM TABLE(GetOrders(:customer, :status))"
        );
    }

    #[test]
    fn sqlite_has_no_procedures() {
        assert!(matches!(
            descriptor().render(Dialect::SqlLite),
            Err(JoineryError::DialectUnsupportedOperator { dialect: Dialect::SqlLite, .. })
        ));
    }

    #[test]
    fn rebinding_replaces_the_value() {
        let descriptor = descriptor().param("customer", 9);
        assert_eq!(descriptor.params().len(), 2);
        assert_eq!(descriptor.params().get("customer"), Some(&Value::Int32(9)));
    }
}
