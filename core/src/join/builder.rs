use core::marker::PhantomData;

use joinery_types::SqlField;

use super::{Combinator, JoinDefinition, JoinKind, JoinPair, JoinPredicate, Projection};
use crate::alias::{AliasCode, AliasRegistry};
use crate::compiler::{Scope, compile};
use crate::error::{JoineryError, Result};
use crate::expr::{Column, Predicate};
use crate::params::ParameterSet;
use crate::schema::{Entity, OrderBy};

//------------------------------------------------------------------------------
// Shared session state
//------------------------------------------------------------------------------

/// Everything one join session accumulates before it becomes a definition.
#[derive(Debug, Clone)]
struct Session {
    aliases: AliasRegistry,
    pairs: Vec<JoinPair>,
    projection: Projection,
    params: ParameterSet,
    order: Vec<(AliasCode, &'static str, OrderBy)>,
}

impl Session {
    fn current(&mut self) -> Option<&mut JoinPair> {
        self.pairs.last_mut()
    }

    fn where_clause<E: Entity>(&mut self, predicate: &Predicate<E>) -> Result<()> {
        let compiled = compile(predicate.expr(), &Scope::aliased(&self.aliases), &mut self.params)?;
        if let Some(pair) = self.pairs.last_mut() {
            pair.wheres.push(compiled);
        }
        Ok(())
    }

    fn link(&mut self, combinator: Combinator, left: &'static str, right: &'static str) {
        if let Some(pair) = self.current() {
            let predicate = JoinPredicate {
                combinator,
                left_alias: pair.left,
                left_column: left,
                right_alias: pair.right,
                right_column: right,
            };
            pair.predicates.push(predicate);
        }
    }

    fn cast<E: Entity, S: SqlField>(&mut self, property: &'static str, source: Column<E, S>) {
        let Some(alias) = self.aliases.get(E::table_ref().id()) else {
            return;
        };
        match self.projection.claim(property, alias, source.name(), S::FIELD_TYPE) {
            Ok(true) => {}
            Ok(false) => {
                crate::joinery_trace_binding!(property, "already occupied");
            }
            Err(_err) => {
                crate::joinery_trace_binding!(property, _err);
            }
        }
    }
}

//------------------------------------------------------------------------------
// Pipeline states
//------------------------------------------------------------------------------

/// Starts a join session projecting into `D`.
pub fn join<D: Entity>() -> JoinPipeline<D> {
    JoinPipeline {
        session: Session {
            aliases: AliasRegistry::new(),
            pairs: Vec::new(),
            projection: Projection::for_dto(&D::table_ref()),
            params: ParameterSet::new(),
            order: Vec::new(),
        },
        _dto: PhantomData,
    }
}

/// Join-kind selection: the start of every pair.
#[derive(Debug)]
pub struct JoinPipeline<D> {
    session: Session,
    _dto: PhantomData<fn() -> D>,
}

/// A pair whose join kind is chosen, waiting for its `on`.
#[derive(Debug)]
pub struct PendingJoin<D, L, R> {
    session: Session,
    kind: JoinKind,
    _tables: PhantomData<fn() -> (D, L, R)>,
}

/// A pair with at least one join predicate.
#[derive(Debug)]
pub struct JoinStep<D, L, R> {
    session: Session,
    _tables: PhantomData<fn() -> (D, L, R)>,
}

impl<D: Entity> JoinPipeline<D> {
    fn pending<L: Entity, R: Entity>(self, kind: JoinKind) -> PendingJoin<D, L, R> {
        PendingJoin {
            session: self.session,
            kind,
            _tables: PhantomData,
        }
    }

    pub fn inner_join<L: Entity, R: Entity>(self) -> PendingJoin<D, L, R> {
        self.pending(JoinKind::Inner)
    }

    pub fn left_join<L: Entity, R: Entity>(self) -> PendingJoin<D, L, R> {
        self.pending(JoinKind::Left)
    }

    pub fn right_join<L: Entity, R: Entity>(self) -> PendingJoin<D, L, R> {
        self.pending(JoinKind::Right)
    }

    pub fn outer_join<L: Entity, R: Entity>(self) -> PendingJoin<D, L, R> {
        self.pending(JoinKind::FullOuter)
    }
}

impl<D: Entity, L: Entity, R: Entity> PendingJoin<D, L, R> {
    /// Opens the pair with `right.key = left.key`.
    ///
    /// The first pair registers `L` as the base table. Later pairs require
    /// `L` to be aliased already ([`JoineryError::AliasNotFound`] otherwise).
    /// `R` must be new to the session.
    pub fn on<K: SqlField>(self, left: Column<L, K>, right: Column<R, K>) -> Result<JoinStep<D, L, R>> {
        let mut session = self.session;
        let left_alias = if session.pairs.is_empty() {
            session.aliases.alias_for(L::table_ref())?
        } else {
            session.aliases.require(&L::table_ref())?
        };
        if session.aliases.contains(R::table_ref().id()) {
            return Err(JoineryError::InvalidStatement(
                "right-hand table is already part of the join graph",
            ));
        }
        let right_alias = session.aliases.alias_for(R::table_ref())?;

        session.pairs.push(JoinPair {
            kind: self.kind,
            left: left_alias,
            right: right_alias,
            table: R::table_ref(),
            predicates: Vec::new(),
            wheres: Vec::new(),
        });
        session.link(Combinator::On, left.name(), right.name());

        Ok(JoinStep {
            session,
            _tables: PhantomData,
        })
    }
}

impl<D: Entity, L: Entity, R: Entity> JoinStep<D, L, R> {
    /// Adds `AND right.key = left.key` to the current pair.
    pub fn and<K: SqlField>(mut self, left: Column<L, K>, right: Column<R, K>) -> Self {
        self.session.link(Combinator::And, left.name(), right.name());
        self
    }

    /// Adds `OR right.key = left.key` to the current pair.
    pub fn or<K: SqlField>(mut self, left: Column<L, K>, right: Column<R, K>) -> Self {
        self.session.link(Combinator::Or, left.name(), right.name());
        self
    }

    /// Filters on the pair's left table.
    pub fn where_first(mut self, predicate: Predicate<L>) -> Result<Self> {
        self.session.where_clause(&predicate)?;
        Ok(self)
    }

    /// Filters on the pair's right table.
    pub fn where_second(mut self, predicate: Predicate<R>) -> Result<Self> {
        self.session.where_clause(&predicate)?;
        Ok(self)
    }

    /// Claims `property` for a column of the left table, casting when the
    /// types differ. Occupied properties and illegal casts are left alone.
    pub fn cast_column_of_first<T: SqlField, S: SqlField>(
        mut self,
        property: Column<D, T>,
        source: Column<L, S>,
    ) -> Self {
        self.session.cast(property.name(), source);
        self
    }

    /// Same as [`cast_column_of_first`](Self::cast_column_of_first) for the right table.
    pub fn cast_column_of_second<T: SqlField, S: SqlField>(
        mut self,
        property: Column<D, T>,
        source: Column<R, S>,
    ) -> Self {
        self.session.cast(property.name(), source);
        self
    }

    /// Orders the result by a column of any table already in the session.
    pub fn order_by<E: Entity, T: SqlField>(mut self, column: Column<E, T>, order: OrderBy) -> Result<Self> {
        let alias = self.session.aliases.require(&E::table_ref())?;
        self.session.order.push((alias, column.name(), order));
        Ok(self)
    }

    /// Chains another pair onto the same definition.
    pub fn then(self) -> JoinPipeline<D> {
        JoinPipeline {
            session: self.session,
            _dto: PhantomData,
        }
    }

    /// Finishes the session, auto-binding every still-free property.
    pub fn finally(self) -> JoinDefinition {
        let Session {
            aliases,
            pairs,
            mut projection,
            params,
            order,
        } = self.session;
        projection.auto_bind(&aliases);

        JoinDefinition {
            dto: D::table_ref(),
            aliases,
            pairs,
            projection,
            params,
            order,
        }
    }
}
