//! Source generation for built components.
//!
//! Every component yields two files: the generated source, rewritten on
//! every run, and a shell that re-exports it under the plain component
//! name. The shell is written once and then belongs to the user.

use std::path::PathBuf;

use handlebars::Handlebars;
use serde::Serialize;
use sprout_core::errors::CompileError;
use sprout_core::{CompileOptions, Result};

use crate::registry::CompiledComponent;
use crate::text::escape_template_literal;

/// Rules every generated stylesheet starts with.
pub const DEFAULT_STYLES: &str = "\
input { font: inherit; border: inherit; padding: inherit; background-color: inherit; color: inherit; }
input:focus { outline: none; }
.vector :global(svg) { left: 50%; top: 50%; transform: translateX(-50%) translateY(-50%); position: absolute; }";

const BODY_TEMPLATE: &str = "\
export const {{instance}}: React.FC<{{props_type}}> = {{decorator}}(props => {
{{#if destructure}}\t{{destructure}}
{{/if}}\treturn (
\t\t<>
{{indent markup 3}}
\t\t\t<style jsx>{`
{{styles}}
`}</style>
\t\t</>
\t);
});
";

const SOURCE_TEMPLATE: &str = "{{header}}\n{{body}}";

const SHELL_TEMPLATE: &str = "\
import React from 'react';
import { {{instance}} } from './{{generated}}';

export const {{name}}: typeof {{instance}} = props => <{{instance}} {...props} />;
";

/// A file to write below the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
    /// `false` for shells, which must not replace an existing file
    pub overwrite: bool,
}

#[derive(Serialize)]
struct BodyData<'a> {
    instance: &'a str,
    props_type: String,
    decorator: &'a str,
    destructure: Option<String>,
    markup: &'a str,
    styles: String,
}

#[derive(Serialize)]
struct SourceData {
    header: String,
    body: String,
}

#[derive(Serialize)]
struct ShellData<'a> {
    name: &'a str,
    instance: &'a str,
    generated: String,
}

/// Template engine using Handlebars.
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Create an engine with helpers and no templates.
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        Self::register_helpers(&mut handlebars);
        Self { handlebars }
    }

    /// Create an engine with the component templates registered.
    pub fn react() -> Result<Self> {
        let mut engine = Self::new();
        engine.register_template("body", BODY_TEMPLATE)?;
        engine.register_template("source", SOURCE_TEMPLATE)?;
        engine.register_template("shell", SHELL_TEMPLATE)?;
        Ok(engine)
    }

    /// Register a template.
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| CompileError::Template(e.to_string()))?;
        Ok(())
    }

    /// Render a registered template.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        let rendered = self
            .handlebars
            .render(name, data)
            .map_err(|e| CompileError::Template(e.to_string()))?;
        Ok(rendered)
    }

    /// Generated source and shell for one component.
    pub fn generate(
        &self,
        component: &CompiledComponent,
        options: &CompileOptions,
    ) -> Result<Vec<GeneratedFile>> {
        let generated = format!("{}{}", component.file_name, options.file_suffix);

        let body = self.render(
            "body",
            &BodyData {
                instance: &component.instance,
                props_type: props_type(component),
                decorator: &options.decorator,
                destructure: destructure(component),
                markup: &component.markup,
                styles: escape_template_literal(&component.styles),
            },
        )?;
        let source = self.render(
            "source",
            &SourceData {
                header: header(component, options),
                body,
            },
        )?;
        let shell = self.render(
            "shell",
            &ShellData {
                name: &component.name,
                instance: &component.instance,
                generated: generated.clone(),
            },
        )?;

        Ok(vec![
            GeneratedFile {
                path: options.out_dir.join(format!("{generated}.tsx")),
                content: source,
                overwrite: true,
            },
            GeneratedFile {
                path: options.out_dir.join(format!("{}.tsx", component.file_name)),
                content: shell,
                overwrite: false,
            },
        ])
    }

    fn register_helpers(handlebars: &mut Handlebars) {
        // Indent every non-blank line by N tabs
        handlebars.register_helper(
            "indent",
            Box::new(
                |h: &handlebars::Helper,
                 _r: &Handlebars,
                 _ctx: &handlebars::Context,
                 _rc: &mut handlebars::RenderContext,
                 out: &mut dyn handlebars::Output| {
                    let content = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
                    let tabs = h.param(1).and_then(|v| v.value().as_u64()).unwrap_or(1) as usize;

                    let indent = "\t".repeat(tabs);
                    let indented = content
                        .lines()
                        .map(|line| {
                            if line.trim().is_empty() {
                                line.to_string()
                            } else {
                                format!("{indent}{line}")
                            }
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    out.write(&indented)?;
                    Ok(())
                },
            ),
        );
    }
}

impl Default for TemplateEngine<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn header(component: &CompiledComponent, options: &CompileOptions) -> String {
    let mut lines = vec!["import React from 'react';".to_string()];
    lines.extend(options.imports.iter().cloned());
    for import in component.local_components.values() {
        lines.push(format!(
            "import {{ {} }} from './{}';",
            import.name, import.file_name
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn props_type(component: &CompiledComponent) -> String {
    let mut props = String::from("{ nodeId?: string; ");
    for (name, ty) in &component.prop_types {
        props.push_str(&format!("{name}?: {ty}; "));
    }
    props.push('}');
    props
}

fn destructure(component: &CompiledComponent) -> Option<String> {
    if component.prop_types.is_empty() {
        return None;
    }
    let names: Vec<&str> = component.prop_types.keys().map(String::as_str).collect();
    Some(format!("const {{ {} }} = props;", names.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ComponentImport;
    use indexmap::IndexMap;
    use sprout_core::NodeId;

    fn component() -> CompiledComponent {
        let mut prop_types = IndexMap::new();
        prop_types.insert("title".to_string(), "any".to_string());
        prop_types.insert(
            "onSelect".to_string(),
            "React.MouseEventHandler<HTMLElement>".to_string(),
        );
        let mut local_components = IndexMap::new();
        local_components.insert(
            "Badge".to_string(),
            ComponentImport {
                name: "Badge".into(),
                file_name: "badge".into(),
            },
        );
        CompiledComponent {
            name: "CardHeader".into(),
            instance: "CardHeaderGenerated".into(),
            file_name: "card-header".into(),
            root_id: NodeId(0),
            markup: "<div className='figma-0'>\n\t<Badge {...props} nodeId='2' />\n</div>\n".into(),
            styles: format!("{DEFAULT_STYLES}\n.figma-0 {{\ncontent: \"`\";\n}}"),
            prop_types,
            local_components,
        }
    }

    fn generate(options: &CompileOptions) -> Vec<GeneratedFile> {
        TemplateEngine::react().unwrap().generate(&component(), options).unwrap()
    }

    #[test]
    fn test_file_paths() {
        let options = CompileOptions::default().with_out_dir("out");
        let files = generate(&options);

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, PathBuf::from("out/card-header.generated.tsx"));
        assert!(files[0].overwrite);
        assert_eq!(files[1].path, PathBuf::from("out/card-header.tsx"));
        assert!(!files[1].overwrite);
    }

    #[test]
    fn test_generated_source() {
        let source = &generate(&CompileOptions::default())[0].content;

        assert!(source.starts_with("import React from 'react';\nimport { Badge } from './badge';\n"));
        assert!(source.contains(
            "export const CardHeaderGenerated: React.FC<{ nodeId?: string; title?: any; \
             onSelect?: React.MouseEventHandler<HTMLElement>; }> = React.memo(props => {"
        ));
        assert!(source.contains("\tconst { title, onSelect } = props;\n\treturn (\n\t\t<>\n"));
        assert!(source.contains("\t\t\t<div className='figma-0'>\n\t\t\t\t<Badge {...props} nodeId='2' />\n"));
        assert!(source.contains("<style jsx>{`\ninput { font: inherit;"));
        assert!(source.contains("content: \"\\`\";"));
        assert!(source.ends_with("\t\t</>\n\t);\n});\n"));
    }

    #[test]
    fn test_no_destructuring_without_props() {
        let mut component = component();
        component.prop_types.clear();
        let files = TemplateEngine::react()
            .unwrap()
            .generate(&component, &CompileOptions::default())
            .unwrap();

        assert!(!files[0].content.contains("= props;"));
        assert!(files[0].content.contains("React.FC<{ nodeId?: string; }>"));
        assert!(files[0].content.contains("React.memo(props => {\n\treturn (\n"));
    }

    #[test]
    fn test_preset_imports_and_decorator() {
        let options = CompileOptions::from_preset("mobx").unwrap();
        let source = &generate(&options)[0].content;

        assert!(source.contains("import { observer } from 'mobx-react';\n"));
        assert!(source.contains("= observer(props => {"));
    }

    #[test]
    fn test_shell_reexports_generated_component() {
        let shell = &generate(&CompileOptions::default())[1].content;

        assert!(shell.contains("import { CardHeaderGenerated } from './card-header.generated';"));
        assert!(shell.contains(
            "export const CardHeader: typeof CardHeaderGenerated = \
             props => <CardHeaderGenerated {...props} />;"
        ));
    }

    #[test]
    fn test_indent_helper() {
        let mut engine = TemplateEngine::new();
        engine.register_template("t", "{{indent text 2}}").unwrap();
        let out = engine
            .render("t", &serde_json::json!({ "text": "a\n\nb" }))
            .unwrap();
        assert_eq!(out, "\t\ta\n\n\t\tb");
    }
}
