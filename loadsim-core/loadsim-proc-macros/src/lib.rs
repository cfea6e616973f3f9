mod imports;
use crate::imports::*;
mod approx_eq_derive;

/// Derives `ApproxEq` field-by-field for structs with named fields, and by
/// `PartialEq` for enums whose variants carry no data.
#[proc_macro_derive(ApproxEq)]
pub fn approx_eq_derive(input: TokenStream) -> TokenStream {
    approx_eq_derive::approx_eq_derive(input)
}
