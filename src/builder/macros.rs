//! Macros for ergonomic tag definition.

/// Generate a StateTag implementation for simple enums.
///
/// Variants name themselves by default; give a variant an explicit dotted
/// name with `= "..."` when the taxonomy path differs from the Rust name.
///
/// # Example
///
/// ```
/// use replistate::tag_enum;
///
/// tag_enum! {
///     pub enum CombatState {
///         Idle,
///         Attacking = "Combat.Attacking",
///         Dead = "Combat.Dead",
///     }
/// }
/// ```
#[macro_export]
macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(= $tag_name:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateTag for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $crate::tag_enum!(@name $variant $($tag_name)?)),*
                }
            }
        }
    };

    (@name $variant:ident) => {
        stringify!($variant)
    };
    (@name $variant:ident $tag_name:literal) => {
        $tag_name
    };
}
