/// Declares an entity or output type together with its column metadata.
///
/// ```
/// joinery_core::entity! {
///     pub struct Order as "Order" {
///         pub id: i32 => "Id",
///         pub customer_id: i32 => "CustomerId",
///         pub total: f64 => "Total",
///     }
/// }
///
/// use joinery_core::Entity;
/// assert_eq!(Order::TABLE, "Order");
/// assert_eq!(Order::CUSTOMER_ID.name(), "CustomerId");
/// assert_eq!(Order::FIELDS.len(), 3);
/// ```
///
/// Generates the struct (deriving `Debug`, `Clone`, `Default` and
/// `PartialEq`), an [`Entity`](crate::Entity) impl, one upper-case
/// [`Column`](crate::Column) constant per field, and
/// [`FromRow`](crate::FromRow) / [`IntoValues`](crate::IntoValues) impls.
/// Without `as "Table"` the struct name is used as the table name.
#[macro_export]
macro_rules! entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident as $table:literal {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty => $column:literal ),* $(,)?
        }
    ) => {
        $crate::entity!(@emit
            [$(#[$meta])*] $vis $name ($table)
            { $( [$(#[$fmeta])*] $fvis $field : $ty => $column ),* }
        );
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty => $column:literal ),* $(,)?
        }
    ) => {
        $crate::entity!(@emit
            [$(#[$meta])*] $vis $name (stringify!($name))
            { $( [$(#[$fmeta])*] $fvis $field : $ty => $column ),* }
        );
    };

    (@emit
        [$($meta:tt)*] $vis:vis $name:ident ($table:expr)
        { $( [$($fmeta:tt)*] $fvis:vis $field:ident : $ty:ty => $column:literal ),* }
    ) => {
        $($meta)*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $( $($fmeta)* $fvis $field: $ty, )*
        }

        impl $crate::Entity for $name {
            const TABLE: &'static str = $table;
            const FIELDS: &'static [$crate::Field] = &[
                $( $crate::Field::new($column, <$ty as $crate::SqlField>::FIELD_TYPE), )*
            ];
        }

        $crate::__private::paste! {
            #[allow(dead_code)]
            impl $name {
                $(
                    pub const [<$field:upper>]: $crate::Column<$name, $ty> = $crate::Column::new($column);
                )*
            }
        }

        impl $crate::FromRow for $name {
            fn from_row(row: &$crate::Row) -> $crate::Result<Self> {
                Ok(Self {
                    $( $field: row.get_or_default::<$ty>($column)?, )*
                })
            }
        }

        impl $crate::IntoValues for $name {
            fn into_values(self) -> ::std::vec::Vec<(&'static str, $crate::Value)> {
                ::std::vec![ $( ($column, $crate::SqlField::into_value(self.$field)), )* ]
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use joinery_types::{FieldType, Value};

    use crate::{Entity, FromRow, IntoValues, Row};

    crate::entity! {
        /// Untitled table name.
        struct Gadget {
            id: i64 => "Id",
            label: Option<String> => "Label",
        }
    }

    #[test]
    fn table_defaults_to_the_struct_name() {
        assert_eq!(Gadget::TABLE, "Gadget");
        assert_eq!(Gadget::FIELDS[1].ty, FieldType::String);
        assert_eq!(Gadget::LABEL.name(), "Label");
    }

    #[test]
    fn rows_map_both_ways() {
        let gadget = Gadget {
            id: 3,
            label: Some("knob".into()),
        };
        let values = gadget.clone().into_values();
        assert_eq!(values[0], ("Id", Value::Int64(3)));

        let row: Row = values.into_iter().collect();
        assert_eq!(Gadget::from_row(&row).unwrap(), gadget);
    }
}
