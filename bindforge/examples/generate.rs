//! Generates a bindings unit for a small hand-written model on two
//! platforms and prints what came out.
//!
//! Run with: `cargo run --example generate`

use bindforge::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let model = BindingModel {
        classes: vec![ClassDescription {
            name: "vane::MenuLayer".to_string(),
            is_engine_class: false,
            members: vec![
                Member::Bound(MemberDescription {
                    class: "vane::MenuLayer".to_string(),
                    name: "init".to_string(),
                    params: vec![Param::new("vane::Node*", Some("parent"))],
                    ret: TypeDescriptor::new("bool"),
                    kind: MemberKind::Normal,
                    is_static: false,
                    is_virtual: true,
                    is_const: false,
                    id: BindingId(1),
                    platforms: Vec::new(),
                    convention: None,
                }),
                Member::Bound(MemberDescription {
                    class: "vane::MenuLayer".to_string(),
                    name: "MenuLayer".to_string(),
                    params: Vec::new(),
                    ret: TypeDescriptor::void(),
                    kind: MemberKind::Constructor,
                    is_static: false,
                    is_virtual: false,
                    is_const: false,
                    id: BindingId(2),
                    platforms: Vec::new(),
                    convention: None,
                }),
                Member::Bound(MemberDescription {
                    class: "vane::MenuLayer".to_string(),
                    name: "~MenuLayer".to_string(),
                    params: Vec::new(),
                    ret: TypeDescriptor::void(),
                    kind: MemberKind::Destructor,
                    is_static: false,
                    is_virtual: true,
                    is_const: false,
                    id: BindingId(3),
                    platforms: Vec::new(),
                    convention: None,
                }),
            ],
        }],
    };

    for platform in [Platform::Windows, Platform::Android] {
        let unit = generate(&model, platform).expect("model validates");
        println!("==== {platform} ====");
        println!("{}", unit.source);
        for diagnostic in &unit.diagnostics {
            eprintln!("diagnostic: {diagnostic}");
        }
        for failure in &unit.failures {
            eprintln!(
                "failed: {}::{}: {}",
                failure.class, failure.member, failure.error
            );
        }
    }
}
