//! Server rendered dashboard templates

use handlebars::Handlebars;

/// Build the template engine with every dashboard page registered.
/// Templates are compiled into the binary so the server has no
/// runtime dependency on the template directory.
pub fn engine() -> Handlebars<'static> {
    let mut templates = Handlebars::new();

    templates
        .register_partial("header", include_str!("../../templates/header.hbs"))
        .expect("Failed to register header partial");
    templates
        .register_partial("footer", include_str!("../../templates/footer.hbs"))
        .expect("Failed to register footer partial");

    for (name, source) in [
        ("index", include_str!("../../templates/index.hbs")),
        ("webhooks", include_str!("../../templates/webhooks.hbs")),
        ("webhook", include_str!("../../templates/webhook.hbs")),
        ("help", include_str!("../../templates/help.hbs")),
    ] {
        templates
            .register_template_string(name, source)
            .unwrap_or_else(|err| panic!("Failed to register template {}: {}", name, err));
    }

    templates
}
