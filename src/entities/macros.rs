//! Macros for reducing boilerplate when declaring field tables
//!
//! These macros generate the static field table and accessor that the
//! shaping and mapping engine needs for every resource and entity type.

/// Implement [`FieldTable`](crate::core::entity::FieldTable) for a struct
///
/// Each entry maps a public field name to the struct member holding its
/// value. The member type must convert into
/// [`FieldValue`](crate::core::field::FieldValue).
///
/// # Example
///
/// ```rust,ignore
/// impl_field_table!(CountryResource, "country", {
///     "id" => id,
///     "englishName" => english_name,
/// });
/// ```
#[macro_export]
macro_rules! impl_field_table {
    (
        $type:ty,
        $type_name:expr,
        { $( $name:literal => $member:ident ),* $(,)? }
    ) => {
        impl $crate::core::entity::FieldTable for $type {
            fn type_name() -> &'static str {
                $type_name
            }

            fn fields() -> &'static [&'static str] {
                &[ $( $name ),* ]
            }

            #[allow(clippy::clone_on_copy)]
            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    $( $name => Some($crate::core::field::FieldValue::from(self.$member.clone())), )*
                    _ => None,
                }
            }
        }
    };
}

/// Declare a type as a [`Resource`](crate::core::entity::Resource) with its field table
///
/// # Example
///
/// ```rust,ignore
/// impl_resource!(CountryResource, "country", {
///     "id" => id,
///     "englishName" => english_name,
///     "chineseName" => chinese_name,
/// });
/// ```
#[macro_export]
macro_rules! impl_resource {
    ( $type:ty, $type_name:expr, { $( $body:tt )* } ) => {
        $crate::impl_field_table!($type, $type_name, { $( $body )* });

        impl $crate::core::entity::Resource for $type {}
    };
}

/// Declare a type as an [`Entity`](crate::core::entity::Entity) with its field table
///
/// The first declared field is the default sort field.
#[macro_export]
macro_rules! impl_entity {
    ( $type:ty, $type_name:expr, { $( $body:tt )* } ) => {
        $crate::impl_field_table!($type, $type_name, { $( $body )* });

        impl $crate::core::entity::Entity for $type {}
    };
}
