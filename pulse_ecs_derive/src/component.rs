use proc_macro::TokenStream;
use syn::DeriveInput;
use quote::quote;

pub fn impl_component(ast: &DeriveInput) -> TokenStream {
    let name = &ast.ident;

    // The id lives in a static inside `component_id`, which would be shared
    // by every instantiation of a generic type.
    if !ast.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &ast.generics,
            "#[derive(Component)] does not support generic types",
        )
        .to_compile_error()
        .into();
    }

    let gen = quote! {
        impl pulse_ecs::components::Component for #name {
            #[inline(always)]
            fn component_id() -> pulse_ecs::components::ComponentId {
                pulse_ecs::lazy_static! {
                    static ref ID: pulse_ecs::components::ComponentId =
                        pulse_ecs::components::ComponentId::next();
                }
                *ID
            }
        }
    };
    gen.into()
}
