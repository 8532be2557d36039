use intermark::{Class, Registry, Settings, Value};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn main() {
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("{e}, falling back to defaults");
        Settings::default()
    });
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(
                    settings
                        .log_level
                        .parse()
                        .unwrap_or_else(|_| LevelFilter::INFO.into()),
                )
                .from_env_lossy(),
        )
        .with_target(true)
        .init();

    if let Err(e) = run(&Registry::with_settings(&settings)) {
        error!(%e, "demo failed");
        std::process::exit(1);
    }
}

fn run(registry: &Registry) -> intermark::Result<()> {
    // interfaces are plain classes bound to a marker
    let foo = Class::new("IFoo");
    registry.bind_new_marker(&foo)?;
    let bar = Class::new("IBar");
    registry.bind_new_marker(&bar)?;
    let baz = Class::new("IBaz");
    registry.bind_new_marker(&baz)?;

    // extending IFoo is enough for IFoo, the other two are declared
    let implementation = Class::extends("Impl", &foo);
    registry.implements_interface(&implementation, &[&bar, &baz])?;

    let fields = json!({"name": "foo", "key": 123, "kind": "impl"});
    let instance = Value::from(implementation.instantiate(
        fields.as_object().cloned().unwrap_or_default(),
    ));
    for class in [&implementation, &foo, &bar, &baz] {
        let satisfied = registry.satisfies(&instance, class);
        info!(class = %class.name(), satisfied, "is-a");
        println!("ins instanceof {} -> {}", class.name(), satisfied);
    }
    Ok(())
}
