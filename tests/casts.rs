use joinery::prelude::*;
use joinery::{AliasRegistry, FieldType, JoinDefinition, Projection, cast_type_name, is_legal_cast};

entity! {
    pub struct Wide {
        pub flag: bool => "Flag",
        pub int: i32 => "Int",
        pub long: i64 => "Long",
        pub single: f32 => "Single",
        pub double: f64 => "Double",
        pub dec: Decimal => "Dec",
        pub text: String => "Text",
        pub guid: Uuid => "Guid",
        pub at: NaiveDateTime => "At",
        pub bytes: Vec<u8> => "Bytes",
    }
}

entity! {
    pub struct Source {
        pub id: i32 => "Id",
        pub flag: bool => "SrcFlag",
        pub int: i32 => "SrcInt",
        pub long: i64 => "SrcLong",
        pub single: f32 => "SrcSingle",
        pub double: f64 => "SrcDouble",
        pub dec: Decimal => "SrcDec",
        pub text: String => "SrcText",
        pub guid: Uuid => "SrcGuid",
        pub at: NaiveDateTime => "SrcAt",
        pub bytes: Vec<u8> => "SrcBytes",
    }
}

entity! {
    pub struct Anchor {
        pub id: i32 => "AnchorId",
    }
}

fn property_of(ty: FieldType) -> &'static str {
    Wide::FIELDS.iter().find(|f| f.ty == ty).map(|f| f.name).unwrap()
}

const LEGAL: &[(FieldType, FieldType)] = &[
    (FieldType::Int32, FieldType::String),
    (FieldType::Int32, FieldType::Int64),
    (FieldType::Int32, FieldType::Decimal),
    (FieldType::Int32, FieldType::Double),
    (FieldType::Int64, FieldType::String),
    (FieldType::Decimal, FieldType::String),
    (FieldType::Decimal, FieldType::Double),
    (FieldType::Single, FieldType::String),
    (FieldType::Single, FieldType::Double),
    (FieldType::Single, FieldType::Decimal),
    (FieldType::Double, FieldType::String),
    (FieldType::Guid, FieldType::String),
    (FieldType::Bool, FieldType::String),
    (FieldType::Bool, FieldType::Int32),
    (FieldType::Bytes, FieldType::String),
    (FieldType::DateTime, FieldType::String),
];

fn listed(source: FieldType, target: FieldType) -> bool {
    LEGAL
        .iter()
        .any(|&(a, b)| (a, b) == (source, target) || (b, a) == (source, target))
}

#[test]
fn legality_is_exactly_the_listed_pairs() {
    for source in FieldType::ALL {
        for target in FieldType::ALL {
            let expected = source != target && listed(source, target);
            assert_eq!(is_legal_cast(source, target), expected, "{source} -> {target}");
        }
    }
}

#[test]
fn claims_follow_the_matrix() {
    let mut aliases = AliasRegistry::new();
    let alias = aliases.alias_for(Source::table_ref()).unwrap();

    for source in FieldType::ALL {
        for target in FieldType::ALL.into_iter().filter(|&t| t != source) {
            let mut projection = Projection::for_dto(&Wide::table_ref());
            let property = property_of(target);
            let claimed = projection.claim(property, alias, "Src", source);

            let binding = projection.get(property).unwrap();
            if listed(source, target) {
                assert!(matches!(claimed, Ok(true)), "{source} -> {target}");
                assert_eq!(binding.source.and_then(|s| s.cast_to), Some(target));
            } else {
                assert!(
                    matches!(claimed, Err(JoineryError::IllegalCast { .. })),
                    "{source} -> {target}"
                );
                assert!(!binding.is_occupied(), "{source} -> {target}");
            }
        }
    }
}

fn cast_join<T, S>(property: Column<Wide, T>, source: Column<Source, S>) -> JoinDefinition
where
    T: joinery::SqlField,
    S: joinery::SqlField,
{
    join::<Wide>()
        .inner_join::<Source, Anchor>()
        .on(Source::ID, Anchor::ID)
        .unwrap()
        .cast_column_of_first(property, source)
        .finally()
}

#[test]
fn legal_casts_render_the_dialect_type_name() {
    let cases = [
        (cast_join(Wide::TEXT, Source::INT), "SrcInt", "Text", FieldType::String),
        (cast_join(Wide::LONG, Source::INT), "SrcInt", "Long", FieldType::Int64),
        (cast_join(Wide::DEC, Source::SINGLE), "SrcSingle", "Dec", FieldType::Decimal),
        (cast_join(Wide::DOUBLE, Source::DEC), "SrcDec", "Double", FieldType::Double),
        (cast_join(Wide::INT, Source::FLAG), "SrcFlag", "Int", FieldType::Int32),
        (cast_join(Wide::TEXT, Source::GUID), "SrcGuid", "Text", FieldType::String),
        (cast_join(Wide::AT, Source::TEXT), "SrcText", "At", FieldType::DateTime),
        (cast_join(Wide::BYTES, Source::TEXT), "SrcText", "Bytes", FieldType::Bytes),
    ];

    for (definition, column, property, target) in &cases {
        for dialect in Dialect::ALL {
            let sql = definition.render(dialect).unwrap().sql;
            let expected = format!(
                "cast(a.{} as {}) as {}",
                dialect.quote_ident(column),
                cast_type_name(dialect, *target),
                dialect.quote_ident(property)
            );
            assert!(sql.contains(&expected), "{dialect}: {sql}");
        }
    }
}

#[test]
fn illegal_casts_leave_the_property_unbound() {
    // Source columns are prefixed, so nothing here is auto-bound either.
    let definition = cast_join(Wide::INT, Source::SINGLE);
    assert!(!definition.projection().get("Int").unwrap().is_occupied());

    let definition = cast_join(Wide::GUID, Source::INT);
    assert!(!definition.projection().get("Guid").unwrap().is_occupied());
}
