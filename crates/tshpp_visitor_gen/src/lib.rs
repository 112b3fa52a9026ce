#![doc = include_str!("../README.md")]

#[doc(hidden)]
pub use paste::paste;

/// Creates a visitor trait.
///
/// For every `visit fn name(v, args..) -> Result<()> { .. }` this generates
/// - a free function `visit_name(v: &mut V, args..)` running the body, and
/// - a trait method `visit_name(&mut self, args..)` defaulting to that function.
///
/// The trait has an associated `Err` type. Returning `Err` from any method stops
/// whatever is driving the visitor.
#[macro_export]
macro_rules! visitor {
    (
        $(#[$trait_meta:meta])*
        $trait_vis:vis trait $id:ident {
            $(
                $(#[$fn_meta:meta])*
                visit fn $name:ident ($visitor_id:ident $(, $arg:ident : $arg_ty:ty)*) -> Result<()> $block:block
            )*
        }
    ) => {
        $(
            $crate::paste! {
                $(#[$fn_meta])*
                #[allow(unused_variables)]
                $trait_vis fn [<visit_ $name>]<V: $id + ?Sized>(
                    $visitor_id: &mut V
                    $(, $arg: $arg_ty)*
                ) -> ::std::result::Result<(), V::Err> $block
            }
        )*

        $(#[$trait_meta])*
        $trait_vis trait $id {
            /// Returned to stop visiting
            type Err;

            $(
                $crate::paste! {
                    $(#[$fn_meta])*
                    fn [<visit_ $name>](&mut self $(, $arg: $arg_ty)*) -> ::std::result::Result<(), Self::Err> {
                        [<visit_ $name>](self $(, $arg)*)
                    }
                }
            )*
        }
    };
}
