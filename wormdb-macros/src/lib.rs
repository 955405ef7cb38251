//! Procedural macros for the wormdb project.
//!
//! This crate provides the `#[document]` attribute, which turns a declaration of
//! fields into a typed document schema backed by a record.

#[allow(unused_extern_crates)]
extern crate self as wormdb_macros;

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{Expr, Fields, Ident, ItemStruct, LitStr, ext::IdentExt, parse_macro_input};

/// Name of the primary key generated for schemas that do not declare one.
const ID_FIELD: &str = "id";

/// Method names a document already has through `Document` and `DocumentExt`.
const RESERVED: &[&str] = &[
    "save", "update", "delete", "to_dict", "pk", "pk_value", "as_dyn", "as_dyn_mut", "into_dyn",
];

/// One declared attribute.
struct FieldSpec {
    ident: Ident,
    attribute: String,
    name: Option<String>,
    primary_key: bool,
    default: Option<Expr>,
}

impl FieldSpec {
    fn parse(field: &syn::Field) -> syn::Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "document fields must be named"))?;
        let attribute = ident.unraw().to_string();

        if RESERVED.contains(&attribute.as_str()) {
            return Err(syn::Error::new_spanned(
                &ident,
                format!("`{attribute}` is reserved for document operations"),
            ));
        }

        let mut spec = FieldSpec {
            ident,
            attribute,
            name: None,
            primary_key: false,
            default: None,
        };

        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("field")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    spec.name = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("primary_key") {
                    spec.primary_key = true;
                    Ok(())
                } else if meta.path.is_ident("default") {
                    spec.default = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("expected `name`, `primary_key` or `default`"))
                }
            })?;
        }

        Ok(spec)
    }

    fn storage_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.attribute)
    }

    /// `Field` construction expression for the schema declaration.
    fn descriptor(&self) -> TokenStream2 {
        let mut tokens = quote!(::wormdb::field::Field::new());
        if let Some(name) = &self.name {
            tokens.extend(quote!(.named(#name)));
        }
        if self.primary_key {
            tokens.extend(quote!(.primary_key(true)));
        }
        if let Some(default) = &self.default {
            tokens.extend(quote!(.with_default(#default)));
        }
        tokens
    }
}

fn accessors(vis: &syn::Visibility, ident: &Ident, attribute: &str) -> TokenStream2 {
    let setter = format_ident!("set_{}", ident.unraw());
    let get_doc = format!("Returns `{attribute}`, or `None` if it was never set.");
    let set_doc = format!("Assigns `{attribute}`. Null is replaced by the field default, if any.");

    quote! {
        #[doc = #get_doc]
        #vis fn #ident(&self) -> ::std::option::Option<&::wormdb::serde_json::Value> {
            self.document.get(#attribute)
        }

        #[doc = #set_doc]
        #vis fn #setter(
            &mut self,
            value: impl ::std::convert::Into<::wormdb::serde_json::Value>,
        ) -> ::wormdb::error::DocumentStoreResult<()> {
            self.document.set(#attribute, value)
        }
    }
}

fn expand(collection: Option<String>, item: ItemStruct) -> syn::Result<TokenStream2> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&item.generics, "documents cannot be generic"));
    }

    let named = match &item.fields {
        Fields::Named(fields) => &fields.named,
        _ => return Err(syn::Error::new_spanned(&item, "#[document] requires a struct with named fields")),
    };

    let specs = named
        .iter()
        .map(FieldSpec::parse)
        .collect::<syn::Result<Vec<_>>>()?;

    let mut primary = specs.iter().filter(|spec| spec.primary_key);
    let has_primary_key = primary.next().is_some();
    if let Some(second) = primary.next() {
        return Err(syn::Error::new_spanned(
            &second.ident,
            "a document cannot have more than one primary key field",
        ));
    }

    if !has_primary_key {
        if let Some(clash) = specs
            .iter()
            .find(|spec| spec.attribute == ID_FIELD || spec.storage_name() == ID_FIELD)
        {
            return Err(syn::Error::new_spanned(
                &clash.ident,
                "`id` is generated as the primary key; mark a field `#[field(primary_key)]` to use your own",
            ));
        }
    }

    let ItemStruct { attrs, vis, ident, .. } = &item;
    let collection = collection.unwrap_or_else(|| ident.to_string());

    let attributes = specs.iter().map(|spec| spec.attribute.as_str());
    let descriptors = specs.iter().map(FieldSpec::descriptor);

    let mut methods: Vec<TokenStream2> = Vec::with_capacity(specs.len() + 1);
    if !has_primary_key {
        methods.push(accessors(vis, &Ident::new(ID_FIELD, Span::call_site()), ID_FIELD));
    }
    methods.extend(
        specs
            .iter()
            .map(|spec| accessors(vis, &spec.ident, &spec.attribute)),
    );

    Ok(quote! {
        #(#attrs)*
        #vis struct #ident {
            document: ::wormdb::document::DynDocument,
        }

        impl ::wormdb::document::Document for #ident {
            fn collection_name() -> &'static str {
                #collection
            }

            fn declare() -> ::wormdb::schema::SchemaBuilder {
                ::wormdb::schema::Schema::builder(#collection)
                    #(.field(#attributes, #descriptors))*
            }

            fn from_dyn(document: ::wormdb::document::DynDocument) -> Self {
                Self { document }
            }

            fn as_dyn(&self) -> &::wormdb::document::DynDocument {
                &self.document
            }

            fn as_dyn_mut(&mut self) -> &mut ::wormdb::document::DynDocument {
                &mut self.document
            }

            fn into_dyn(self) -> ::wormdb::document::DynDocument {
                self.document
            }
        }

        impl #ident {
            #(#methods)*
        }
    })
}

/// Attribute macro declaring a typed document schema.
///
/// Every named field is a document attribute; its type is ignored and is
/// conventionally written `Field`. Field options go in `#[field(...)]`:
///
/// - `name = "..."` - store the attribute under a different key
/// - `primary_key` - make this attribute the primary key (at most one)
/// - `default = <expr>` - value substituted when the attribute is set to null
///
/// Without a primary key, an auto-incrementing `id` attribute is generated.
/// The collection name defaults to the struct name and can be overridden with
/// `#[document(name = "...")]`.
///
/// ## Generated items
///
/// - the struct itself, wrapping a `DynDocument`
/// - `impl Document`
/// - per attribute `foo`: `foo(&self) -> Option<&Value>` and
///   `set_foo(&mut self, value) -> DocumentStoreResult<()>`
///
/// ## Example
///
/// ```text
/// #[document]
/// pub struct User {
///     #[field(primary_key)]
///     email: Field,
///     #[field(name = "full_name")]
///     name: Field,
///     #[field(default = 18)]
///     age: Field,
/// }
/// ```
#[proc_macro_attribute]
pub fn document(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut collection = None;
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            let lit: LitStr = meta.value()?.parse()?;
            collection = Some(lit.value());
            Ok(())
        } else {
            Err(meta.error("expected `name`"))
        }
    });
    parse_macro_input!(args with parser);

    let item = parse_macro_input!(input as ItemStruct);

    expand(collection, item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
