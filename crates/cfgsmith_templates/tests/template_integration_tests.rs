//! Integration tests for template loading and rendering.

use std::fs;
use std::path::Path;

use cfgsmith_templates::{TemplateError, TemplateLoader};
use serde_yaml::Mapping;
use tempfile::tempdir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_load_and_render_with_inheritance() {
    let temp = tempdir().unwrap();
    write(
        temp.path(),
        "common/layout.j2",
        "! generated\n{% block body %}{% endblock body %}\nend",
    );
    write(
        temp.path(),
        "cisco_ios/base.j2",
        "{% extends \"common/layout\" %}{% block body %}hostname {{ hostname }}{% endblock body %}",
    );

    let renderer = TemplateLoader::new(temp.path()).load_all().unwrap();
    assert_eq!(
        renderer.template_names(),
        vec!["cisco_ios/base", "common/layout"]
    );

    let vars: Mapping = serde_yaml::from_str("hostname: core-01").unwrap();
    let rendered = renderer.render("cisco_ios/base", &vars).unwrap();
    assert_eq!(rendered, "! generated\nhostname core-01\nend");
}

#[test]
fn test_unknown_target_type_is_not_found() {
    let temp = tempdir().unwrap();
    write(temp.path(), "cisco_ios/base.j2", "hostname {{ hostname }}");

    let renderer = TemplateLoader::new(temp.path()).load_all().unwrap();
    let err = renderer.render("juniper/base", &Mapping::new()).unwrap_err();
    assert!(matches!(err, TemplateError::NotFound(_)));
    assert_eq!(err.to_string(), "Template not found: juniper/base");
}
