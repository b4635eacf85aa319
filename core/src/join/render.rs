use joinery_types::{Dialect, cast_type_name};

use super::{Combinator, JoinDefinition, ProjectionBinding};
use crate::alias::AliasCode;
use crate::builder::{Statement, direction};
use crate::compiler::CompiledPredicate;
use crate::error::{JoineryError, Result};
use crate::schema::TableRef;
use crate::sql::{KeywordCase, Sql, SqlChunk, Token, render_predicate};

impl JoinDefinition {
    /// Renders the definition for `dialect`.
    ///
    /// Join statements use lower-case keywords and alias-qualified columns:
    ///
    /// ```text
    /// select a."Id" as "Id", b."Name" as "Name" from "Order" a
    /// inner join "Customer" b on b."Id" = a."CustomerId" where a."Total" > @Total0
    /// ```
    ///
    /// Unoccupied properties are left out of the select list.
    pub fn render(&self, dialect: Dialect) -> Result<Statement> {
        crate::joinery_profile_scope!("statement", "join");
        let Some((base_alias, base)) = self.base() else {
            return Err(JoineryError::InvalidStatement("join definition without tables"));
        };

        let columns: Vec<_> = self
            .projection
            .occupied()
            .filter_map(|binding| select_item(binding, dialect))
            .collect();
        if columns.is_empty() {
            return Err(JoineryError::InvalidStatement("join projection binds no property"));
        }

        let mut sql = Sql::token(Token::SELECT)
            .append(Sql::join(columns, Token::COMMA))
            .push(Token::FROM)
            .append(aliased_table(base, base_alias));

        for pair in &self.pairs {
            sql.append_mut(pair.kind.tokens().iter().copied().collect::<Sql<'_>>());
            sql.append_mut(aliased_table(&pair.table, pair.right));
            for predicate in &pair.predicates {
                sql.push_mut(match predicate.combinator {
                    Combinator::On => Token::ON,
                    Combinator::And => Token::AND,
                    Combinator::Or => Token::OR,
                });
                sql.push_mut(SqlChunk::column(Some(predicate.right_alias), predicate.right_column));
                sql.push_mut(Token::EQ);
                sql.push_mut(SqlChunk::column(Some(predicate.left_alias), predicate.left_column));
            }
        }

        let clauses: Vec<&CompiledPredicate> = self
            .pairs
            .iter()
            .flat_map(|pair| pair.wheres.iter())
            .filter(|clause| !clause.is_empty())
            .collect();
        if !clauses.is_empty() {
            let grouped = clauses.len() > 1;
            let mut parts = Vec::with_capacity(clauses.len());
            for clause in clauses {
                let body = render_predicate(clause, dialect)?;
                parts.push(if grouped && clause.has_connectors() {
                    body.parens()
                } else {
                    body
                });
            }
            sql.push_mut(Token::WHERE);
            sql.append_mut(Sql::join(parts, Token::AND));
        }

        if !self.order.is_empty() {
            let items = self.order.iter().map(|&(alias, column, order)| {
                Sql::from(SqlChunk::column(Some(alias), column)).push(direction(order))
            });
            sql.append_mut(Sql::from_iter([Token::ORDER, Token::BY]).append(Sql::join(items, Token::COMMA)));
        }

        let statement = Statement::render(&sql, self.params.clone(), dialect, KeywordCase::Lower);
        Ok(statement)
    }
}

fn aliased_table(table: &TableRef, alias: AliasCode) -> Sql<'static> {
    Sql::from(SqlChunk::ident(table.name())).push(SqlChunk::raw(alias.to_string()))
}

/// `a."Col" as "Prop"` or `cast(a."Col" as <type>) as "Prop"`.
fn select_item(binding: &ProjectionBinding, dialect: Dialect) -> Option<Sql<'static>> {
    let source = binding.source?;
    let column = Sql::from(SqlChunk::column(Some(source.alias), source.column));
    let value = match source.cast_to {
        Some(target) => Sql::func(
            "CAST",
            column
                .push(Token::AS)
                .push(SqlChunk::raw(cast_type_name(dialect, target))),
        ),
        None => column,
    };
    Some(value.push(Token::AS).push(SqlChunk::ident(binding.property)))
}

#[cfg(test)]
mod tests {
    use joinery_types::{Dialect, FieldType, NaiveDateTime};

    use crate::error::JoineryError;
    use crate::join::{JoinKind, join};
    use crate::schema::OrderBy;

    crate::entity! {
        pub struct Order as "Order" {
            pub id: i32 => "Id",
            pub customer_id: i32 => "CustomerId",
            pub total: f64 => "Total",
            pub status: String => "Status",
            pub placed: NaiveDateTime => "Placed",
        }
    }

    crate::entity! {
        pub struct Customer as "Customer" {
            pub id: i32 => "Id",
            pub name: String => "Name",
            pub region_id: i32 => "RegionId",
        }
    }

    crate::entity! {
        pub struct Region as "Region" {
            pub id: i32 => "Id",
            pub label: String => "Label",
        }
    }

    crate::entity! {
        pub struct OrderSummary {
            pub id: i32 => "Id",
            pub name: String => "Name",
            pub total: String => "Total",
            pub label: String => "Label",
        }
    }

    #[test]
    fn inner_join_with_filter() {
        let definition = join::<OrderSummary>()
            .inner_join::<Order, Customer>()
            .on(Order::CUSTOMER_ID, Customer::ID)
            .unwrap()
            .where_first(Order::TOTAL.gt(100.0))
            .unwrap()
            .finally();

        let statement = definition.render(Dialect::Postgres).unwrap();
        assert_eq!(
            statement.sql,
            r#"select a."Id" as "Id", b."Name" as "Name" from "Order" a inner join "Customer" b on b."Id" = a."CustomerId" where a."Total" > @Total0"#
        );
        assert_eq!(statement.params.names().collect::<Vec<_>>(), ["Total0"]);
    }

    #[test]
    fn casts_render_dialect_type_names() {
        let definition = join::<OrderSummary>()
            .inner_join::<Order, Customer>()
            .on(Order::CUSTOMER_ID, Customer::ID)
            .unwrap()
            .cast_column_of_first(OrderSummary::TOTAL, Order::TOTAL)
            .finally();

        let sql = definition.render(Dialect::SqlServer).unwrap().sql;
        assert!(sql.contains("cast(a.[Total] as nvarchar(max)) as [Total]"), "{sql}");
        let sql = definition.render(Dialect::Postgres).unwrap().sql;
        assert!(sql.contains(r#"cast(a."Total" as text) as "Total""#), "{sql}");
    }

    #[test]
    fn chained_pairs_share_aliases_and_parameters() {
        let definition = join::<OrderSummary>()
            .left_join::<Order, Customer>()
            .on(Order::CUSTOMER_ID, Customer::ID)
            .unwrap()
            .where_first(Order::STATUS.eq("open").or(Order::STATUS.eq("held")))
            .unwrap()
            .then()
            .inner_join::<Customer, Region>()
            .on(Customer::REGION_ID, Region::ID)
            .unwrap()
            .where_second(Region::LABEL.ne("EU"))
            .unwrap()
            .order_by(Customer::NAME, OrderBy::Desc)
            .unwrap()
            .finally();

        assert_eq!(definition.pairs().len(), 2);
        assert_eq!(definition.pairs()[1].kind, JoinKind::Inner);
        let sql = definition.render(Dialect::Postgres).unwrap().sql;
        assert!(
            sql.ends_with(
                r#"left join "Customer" b on b."Id" = a."CustomerId" inner join "Region" c on c."Id" = b."RegionId" where (a."Status" = @Status0 or a."Status" = @Status1) and c."Label" <> @Label2 order by b."Name" desc"#
            ),
            "{sql}"
        );
        assert!(sql.contains(r#"c."Label" as "Label""#));
    }

    #[test]
    fn and_or_extend_only_the_current_pair() {
        let definition = join::<OrderSummary>()
            .inner_join::<Order, Customer>()
            .on(Order::CUSTOMER_ID, Customer::ID)
            .unwrap()
            .or(Order::ID, Customer::ID)
            .then()
            .inner_join::<Customer, Region>()
            .on(Customer::REGION_ID, Region::ID)
            .unwrap()
            .and(Customer::ID, Region::ID)
            .finally();

        assert_eq!(definition.pairs()[0].predicates.len(), 2);
        assert_eq!(definition.pairs()[1].predicates.len(), 2);
        let sql = definition.render(Dialect::MySql).unwrap().sql;
        assert!(
            sql.contains("on b.`Id` = a.`CustomerId` or b.`Id` = a.`Id` inner join"),
            "{sql}"
        );
        assert!(sql.ends_with("on c.`Id` = b.`RegionId` and c.`Id` = b.`Id`"), "{sql}");
    }

    #[test]
    fn later_pairs_need_an_aliased_left_side() {
        let err = join::<OrderSummary>()
            .inner_join::<Order, Customer>()
            .on(Order::CUSTOMER_ID, Customer::ID)
            .unwrap()
            .then()
            .inner_join::<Region, Order>()
            .on(Region::ID, Order::ID)
            .unwrap_err();
        assert!(matches!(err, JoineryError::AliasNotFound { table: "Region" }));
    }

    #[test]
    fn illegal_cast_is_a_silent_no_op() {
        let definition = join::<OrderSummary>()
            .inner_join::<Order, Customer>()
            .on(Order::CUSTOMER_ID, Customer::ID)
            .unwrap()
            // datetime -> int32 is outside the matrix
            .cast_column_of_first(OrderSummary::ID, Order::PLACED)
            .finally();

        // left free by the cast, then filled by auto-binding
        let id = definition.projection().get("Id").unwrap().source.unwrap();
        assert_eq!(id.column, "Id");
        assert_eq!(id.cast_to, None);
    }

    #[test]
    fn first_cast_claim_wins() {
        let definition = join::<OrderSummary>()
            .inner_join::<Order, Customer>()
            .on(Order::CUSTOMER_ID, Customer::ID)
            .unwrap()
            // int32 -> string is legal, so this claims Name first
            .cast_column_of_first(OrderSummary::NAME, Order::ID)
            // second claim for Name is ignored
            .cast_column_of_second(OrderSummary::NAME, Customer::NAME)
            .finally();

        let name = definition.projection().get("Name").unwrap().source.unwrap();
        assert_eq!(name.column, "Id");
        assert_eq!(name.cast_to, Some(FieldType::String));
    }
}
