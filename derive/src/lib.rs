//! marshal-derive
//!
//! `#[derive(Record)]` for `marshal_core`. Generates the `Record` and `Wire`
//! impls of a struct from its field list, in declaration order.
//!
//! - Every field participates unless it carries `#[marshal(skip)]`; visibility
//!   plays no part.
//! - A skipped field is never written and is left untouched on decode.
//! - Enums and unions are rejected: a tagged union has no declared wire strategy.
//! - Field types with no wire mapping that can be recognised syntactically
//!   (references, pointers, `Option`, maps, `usize`/`isize`, arrays, tuples)
//!   are rejected with a pointed error; anything else must implement `Wire`.
//! - Type parameters get a `Wire` bound, and every field type built from a
//!   parameter (`Vec<T>`) gets a `Wire` where-predicate of its own. Types that
//!   also mention themselves (`Vec<Node<T>>`) are left to the container
//!   attribute `#[marshal(bound = "T: Wire + Default")]`, which replaces all
//!   inferred bounds.

use proc_macro::TokenStream;
use proc_macro2::{Ident, TokenStream as TokenStream2, TokenTree};
use quote::{quote, ToTokens};
use syn::{
    parse_macro_input, parse_quote, punctuated::Punctuated, spanned::Spanned, Data, DeriveInput,
    Error, Fields, GenericArgument, GenericParam, Index, LitStr, Member, PathArguments, Token,
    Type, WherePredicate,
};

#[proc_macro_derive(Record, attributes(marshal))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_record(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

struct WireField {
    member: Member,
    name: String,
    ty: Type,
}

fn expand_record(mut input: DeriveInput) -> Result<TokenStream2, Error> {
    let fields = match &input.data {
        Data::Struct(data) => collect_fields(&data.fields)?,
        Data::Enum(data) => {
            return Err(Error::new(
                data.enum_token.span(),
                "#[derive(Record)] cannot be used on enums: tagged unions have no wire mapping",
            ));
        }
        Data::Union(data) => {
            return Err(Error::new(
                data.union_token.span(),
                "#[derive(Record)] cannot be used on unions",
            ));
        }
    };

    match container_bound(&input)? {
        Some(predicates) => {
            input.generics.make_where_clause().predicates.extend(predicates);
        }
        None => add_inferred_bounds(&mut input, &fields),
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let ident = &input.ident;
    let record_name = ident.to_string();
    let members: Vec<&Member> = fields.iter().map(|f| &f.member).collect();
    let names: Vec<&String> = fields.iter().map(|f| &f.name).collect();
    let tys: Vec<&Type> = fields.iter().map(|f| &f.ty).collect();

    Ok(quote! {
        impl #impl_generics ::marshal_core::Record for #ident #ty_generics #where_clause {
            fn record_shape() -> ::marshal_core::shape::RecordShape {
                ::marshal_core::shape::build_record_shape::<Self>(|| {
                    ::marshal_core::shape::RecordShape::new(#record_name)
                        #(.field(#names, <#tys as ::marshal_core::Wire>::wire_shape()))*
                })
            }

            #[allow(unused_variables)]
            fn encode_fields<__W: ::std::io::Write>(
                &self,
                enc: &mut ::marshal_core::Encoder<__W>,
            ) -> ::marshal_core::Result<()> {
                #(
                    <#tys as ::marshal_core::Wire>::encode_wire(&self.#members, enc)
                        .map_err(|e| e.in_field(#names))?;
                )*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn decode_fields<__R: ::std::io::Read>(
                &mut self,
                dec: &mut ::marshal_core::Decoder<__R>,
            ) -> ::marshal_core::Result<()> {
                #(
                    <#tys as ::marshal_core::Wire>::decode_wire(&mut self.#members, dec)?;
                )*
                ::core::result::Result::Ok(())
            }
        }

        impl #impl_generics ::marshal_core::Wire for #ident #ty_generics #where_clause {
            const MIN_WIRE_LEN: usize = 0 #(+ <#tys as ::marshal_core::Wire>::MIN_WIRE_LEN)*;

            fn wire_shape() -> ::marshal_core::shape::TypeShape {
                ::marshal_core::shape::record_field_shape::<Self>(#record_name)
            }

            fn wire_kind() -> ::marshal_core::shape::WireKind {
                ::marshal_core::shape::WireKind::Record
            }

            fn encode_wire<__W: ::std::io::Write>(
                &self,
                enc: &mut ::marshal_core::Encoder<__W>,
            ) -> ::marshal_core::Result<()> {
                enc.write_record(self)
            }

            fn decode_wire<__R: ::std::io::Read>(
                &mut self,
                dec: &mut ::marshal_core::Decoder<__R>,
            ) -> ::marshal_core::Result<()> {
                dec.read_record(self)
            }
        }
    })
}

/// `#[marshal(bound = "...")]` on the container, if present.
fn container_bound(input: &DeriveInput) -> Result<Option<Vec<WherePredicate>>, Error> {
    let mut bound = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("marshal") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("bound") {
                let lit: LitStr = meta.value()?.parse()?;
                let predicates =
                    lit.parse_with(Punctuated::<WherePredicate, Token![,]>::parse_terminated)?;
                bound = Some(predicates.into_iter().collect());
                Ok(())
            } else {
                Err(meta.error("unknown marshal container attribute, expected `bound`"))
            }
        })?;
    }
    Ok(bound)
}

fn add_inferred_bounds(input: &mut DeriveInput, fields: &[WireField]) {
    let params: Vec<Ident> = input
        .generics
        .type_params()
        .map(|p| p.ident.clone())
        .collect();
    if params.is_empty() {
        return;
    }

    for param in input.generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::marshal_core::Wire));
        }
    }

    let self_ident = std::slice::from_ref(&input.ident);
    let predicates: Vec<WherePredicate> = fields
        .iter()
        .filter(|f| !is_bare_param(&f.ty, &params))
        .filter(|f| mentions(f.ty.to_token_stream(), &params))
        .filter(|f| !mentions(f.ty.to_token_stream(), self_ident))
        .map(|f| {
            let ty = &f.ty;
            parse_quote!(#ty: ::marshal_core::Wire)
        })
        .collect();
    input.generics.make_where_clause().predicates.extend(predicates);
}

fn is_bare_param(ty: &Type, params: &[Ident]) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => match path.path.get_ident() {
            Some(ident) => params.contains(ident),
            None => false,
        },
        _ => false,
    }
}

fn mentions(tokens: TokenStream2, idents: &[Ident]) -> bool {
    tokens.into_iter().any(|tt| match tt {
        TokenTree::Ident(ident) => idents.contains(&ident),
        TokenTree::Group(group) => mentions(group.stream(), idents),
        _ => false,
    })
}

fn collect_fields(fields: &Fields) -> Result<Vec<WireField>, Error> {
    let mut out = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        if is_skipped(field)? {
            continue;
        }
        reject_unsupported(&field.ty)?;

        let (member, name) = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
            None => (
                Member::Unnamed(Index { index: i as u32, span: field.ty.span() }),
                i.to_string(),
            ),
        };
        out.push(WireField { member, name, ty: field.ty.clone() });
    }
    Ok(out)
}

fn is_skipped(field: &syn::Field) -> Result<bool, Error> {
    let mut skip = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("marshal") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown marshal attribute, expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

/// Compile-time counterpart of `UnsupportedFieldType` for shapes that are
/// recognisable from syntax alone.
fn reject_unsupported(ty: &Type) -> Result<(), Error> {
    let what = match ty {
        Type::Reference(_) => Some("references"),
        Type::Ptr(_) => Some("raw pointers"),
        Type::BareFn(_) => Some("function pointers"),
        Type::TraitObject(_) | Type::ImplTrait(_) => Some("trait objects"),
        Type::Tuple(_) => Some("tuples"),
        Type::Array(_) | Type::Slice(_) => Some("fixed-size arrays and slices (use Vec<T>)"),
        Type::Paren(inner) => return reject_unsupported(&inner.elem),
        Type::Group(inner) => return reject_unsupported(&inner.elem),
        Type::Path(path) => {
            let Some(last) = path.path.segments.last() else {
                return Ok(());
            };
            let what = match last.ident.to_string().as_str() {
                "Option" => Some("optional values"),
                "HashMap" | "BTreeMap" | "IndexMap" => Some("maps"),
                "HashSet" | "BTreeSet" => Some("sets"),
                "usize" | "isize" => Some("platform-width integers"),
                _ => None,
            };
            if what.is_none() {
                if let PathArguments::AngleBracketed(args) = &last.arguments {
                    for arg in &args.args {
                        if let GenericArgument::Type(inner) = arg {
                            reject_unsupported(inner)?;
                        }
                    }
                }
            }
            what
        }
        _ => None,
    };

    match what {
        Some(what) => Err(Error::new(
            ty.span(),
            format!("unsupported field type: {} have no wire mapping", what),
        )),
        None => Ok(()),
    }
}
