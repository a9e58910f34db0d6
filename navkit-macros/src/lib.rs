use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derive macro that splits a plain state struct into one signal per field.
///
/// For `struct PanelState { has_scrolled: bool }` this generates:
/// - `PanelStateSignals`: `Copy`, one `Signal` per field, with `new(value)`,
///   `get()`, `get_untracked()`, `set(value)` and `writers()`.
/// - `PanelStateWriters`: `Copy`, one `WriteSignal` per field, with `set(value)`.
///
/// Field types must be `Clone + PartialEq + 'static`. `set` writes every field
/// inside a single batch, so effects see the new state once.
///
/// # Example
/// ```ignore
/// #[derive(Clone, PartialEq, SignalFields)]
/// struct PanelState {
///     has_scrolled: bool,
/// }
///
/// let state = PanelStateSignals::new(PanelState { has_scrolled: false });
/// state.has_scrolled.set(true);
/// ```
#[proc_macro_derive(SignalFields)]
pub fn derive_signal_fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let struct_name = &input.ident;
    let vis = &input.vis;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    struct_name,
                    "SignalFields can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(
                struct_name,
                "SignalFields can only be derived for structs",
            )
            .to_compile_error()
            .into();
        }
    };

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.generics,
            "SignalFields does not support generic structs",
        )
        .to_compile_error()
        .into();
    }

    let signals_name = format_ident!("{}Signals", struct_name);
    let writers_name = format_ident!("{}Writers", struct_name);

    let names: Vec<_> = fields.iter().filter_map(|f| f.ident.as_ref()).collect();
    let field_vis: Vec<_> = fields.iter().map(|f| &f.vis).collect();
    let types: Vec<_> = fields.iter().map(|f| &f.ty).collect();

    let expanded = quote! {
        #[derive(Clone, Copy)]
        #vis struct #signals_name {
            #(#field_vis #names: ::navkit::reactive::Signal<#types>,)*
        }

        impl #signals_name {
            #vis fn new(value: #struct_name) -> Self {
                Self {
                    #(#names: ::navkit::reactive::create_signal(value.#names),)*
                }
            }

            /// Snapshot of all fields (tracked).
            #vis fn get(&self) -> #struct_name {
                #struct_name {
                    #(#names: self.#names.get(),)*
                }
            }

            #vis fn get_untracked(&self) -> #struct_name {
                #struct_name {
                    #(#names: self.#names.get_untracked(),)*
                }
            }

            /// Write every field in one batch; unchanged fields do not notify.
            #vis fn set(&self, value: #struct_name) {
                ::navkit::reactive::batch(|| {
                    #(self.#names.set(value.#names);)*
                });
            }

            #vis fn writers(&self) -> #writers_name {
                #writers_name {
                    #(#names: self.#names.split().1,)*
                }
            }
        }

        #[derive(Clone, Copy)]
        #vis struct #writers_name {
            #(#names: ::navkit::reactive::WriteSignal<#types>,)*
        }

        impl #writers_name {
            #vis fn set(&self, value: #struct_name) {
                ::navkit::reactive::batch(|| {
                    #(self.#names.set(value.#names);)*
                });
            }
        }
    };

    TokenStream::from(expanded)
}
