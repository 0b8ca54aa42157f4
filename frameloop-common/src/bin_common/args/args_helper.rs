/// Declares a group of clap arguments together with a [`Default`] that agrees with the
/// CLI defaults and builder style setters, so library code can construct the same group
/// without going through clap.
///
/// ```ignore
/// args! {
///     #[derive(Copy, Clone)]
///     Thing {
///         "Help text"
///         some_field: u32 = 5;
///
///         nested: OtherThing;
///     }
/// }
/// ```
#[macro_export]
macro_rules! args {
    ($(#$argsmeta:tt)* $name:ident {
        $($fhelp:literal $fname:ident: $ftype:ty = $fdefault:expr;)*
        $($mname:ident: $mtype:ty;)*
    }) => {
        #[derive(clap::Args, Debug)]
        $(#$argsmeta)*
        pub struct $name {
            $(
                #[arg(long, default_value_t = ($fdefault), help = $fhelp)]
                $fname: $ftype,
            )*

            $(
                #[command(flatten)]
                $mname: $mtype,
            )*
        }

        impl std::default::Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $fname: $fdefault,
                    )*

                    $(
                        $mname: <$mtype>::default(),
                    )*
                }
            }
        }

        impl $name {
            $(
                pub fn $fname(mut self, $fname: $ftype) -> Self {
                    self.$fname = $fname;
                    self
                }
            )*

            $(
                pub fn $mname(mut self, $mname: $mtype) -> Self {
                    self.$mname = $mname;
                    self
                }
            )*
        }
    };
}

pub use args;
