//! Literal parsing helpers for `#[entity]` attributes.

use syn::meta::ParseNestedMeta;
use syn::{Lit, LitStr, Token, parenthesized};

/// Parses a string literal value for `key`.
pub(super) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let literal = meta.value()?.parse::<Lit>()?;
    match literal {
        Lit::Str(text) => Ok(text),
        other => Err(syn::Error::new(
            other.span(),
            format!("{key} must be a string"),
        )),
    }
}

/// Consumes a key's value or nested list without recording it.
///
/// Exactly one expression or parenthesized group is read, so keys that
/// follow in the same attribute are still visited.
pub(super) fn discard_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}
