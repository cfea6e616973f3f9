pub use proc_macro::TokenStream;
pub use proc_macro2::TokenStream as TokenStream2;
pub use quote::{quote, TokenStreamExt};
pub use syn::{spanned::Spanned, Data, DeriveInput, Fields};
