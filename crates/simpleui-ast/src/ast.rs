use serde::{Deserialize, Serialize};

// ── Expression ────────────────────────────────────────────────────────────

/// Operator of a [`Expression::BinaryOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

/// A value-producing expression.
///
/// ```json
/// { "type": "BinaryOperation",
///   "left":  { "type": "StringLiteral", "value": "Hello " },
///   "op":    "+",
///   "right": { "type": "SymbolReference", "symbol": "name" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    StringLiteral { value: String },
    NumberLiteral { value: f64 },
    /// Name of a component parameter (markup) or function parameter (script).
    SymbolReference { symbol: String },
    /// Run-time value of the textbox with the given element name.
    /// Only meaningful inside scripts.
    TextboxValue { textbox: String },
    BinaryOperation {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn string(value: impl Into<String>) -> Self {
        Expression::StringLiteral { value: value.into() }
    }

    pub fn number(value: f64) -> Self {
        Expression::NumberLiteral { value }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Expression::SymbolReference { symbol: name.into() }
    }

    pub fn textbox(name: impl Into<String>) -> Self {
        Expression::TextboxValue { textbox: name.into() }
    }

    pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Self {
        Expression::BinaryOperation { left: Box::new(left), op, right: Box::new(right) }
    }

    /// Type of the expression when it can be known without evaluating it.
    ///
    /// `params` are the parameters visible to symbol references (the
    /// enclosing component's parameter list). Returns `None` for textbox
    /// lookups, unresolved symbols, and sums of unknown operands.
    pub fn static_type(&self, params: &[Parameter]) -> Option<ParamType> {
        match self {
            Expression::StringLiteral { .. } => Some(ParamType::String),
            Expression::NumberLiteral { .. } => Some(ParamType::Number),
            Expression::SymbolReference { symbol } => {
                params.iter().find(|p| &p.name == symbol).map(|p| p.ty)
            }
            Expression::TextboxValue { .. } => None,
            Expression::BinaryOperation { left, op, right } => {
                let l = left.static_type(params);
                let r = right.static_type(params);
                match op {
                    BinaryOp::Add => match (l, r) {
                        (Some(ParamType::String), _) | (_, Some(ParamType::String)) => {
                            Some(ParamType::String)
                        }
                        (Some(ParamType::Number), Some(ParamType::Number)) => {
                            Some(ParamType::Number)
                        }
                        _ => None,
                    },
                    BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => Some(ParamType::Number),
                }
            }
        }
    }

    /// Visit this expression and every nested sub-expression, depth-first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expression)) {
        f(self);
        if let Expression::BinaryOperation { left, right, .. } = self {
            left.walk(f);
            right.walk(f);
        }
    }
}

// ── CSS ───────────────────────────────────────────────────────────────────

/// Property kinds accepted in inline styles and document style rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CssPropertyKind {
    TextColor,
    FontSize,
    Height,
    Width,
    BackgroundColor,
    /// Legacy spelling of `text-color`.
    Color,
    /// Legacy spelling of `font-size`.
    Size,
}

impl CssPropertyKind {
    /// The CSS property name this kind renders to.
    pub fn css_name(self) -> &'static str {
        match self {
            CssPropertyKind::TextColor | CssPropertyKind::Color => "color",
            CssPropertyKind::FontSize | CssPropertyKind::Size => "font-size",
            CssPropertyKind::Height => "height",
            CssPropertyKind::Width => "width",
            CssPropertyKind::BackgroundColor => "background-color",
        }
    }

    /// Whether bare numbers are lengths that need a `px` unit.
    pub fn takes_pixels(self) -> bool {
        matches!(
            self,
            CssPropertyKind::FontSize
                | CssPropertyKind::Size
                | CssPropertyKind::Height
                | CssPropertyKind::Width
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssProperty {
    pub property: CssPropertyKind,
    pub value: Expression,
}

impl CssProperty {
    pub fn new(property: CssPropertyKind, value: Expression) -> Self {
        Self { property, value }
    }
}

/// Which group of generated tags a document-level [`StyleRule`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleTarget {
    /// Text-bearing tags: paragraphs, headings, links, labels.
    Text,
    /// Box-like tags: divs, sections, buttons, images, inputs.
    Objects,
}

impl StyleTarget {
    pub fn selector(self) -> &'static str {
        match self {
            StyleTarget::Text => "p, h1, h2, h3, h4, h5, h6, a, label",
            StyleTarget::Objects => "div, section, button, img, input",
        }
    }
}

/// A stylesheet rule declared in the document itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub target: StyleTarget,
    #[serde(default)]
    pub properties: Vec<CssProperty>,
}

// ── Attributes ────────────────────────────────────────────────────────────

/// Fields shared by every attribute-bearing element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attrs {
    /// Element identifier; becomes the `id` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Class names looked up in the base stylesheet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Inline style properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub css: Vec<CssProperty>,
}

impl Attrs {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_css(mut self, property: CssPropertyKind, value: Expression) -> Self {
        self.css.push(CssProperty::new(property, value));
        self
    }
}

// ── Elements ──────────────────────────────────────────────────────────────

/// `onclick` binding of a button: a script function and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnClick {
    pub function: String,
    #[serde(default)]
    pub args: Vec<Expression>,
}

/// An explicit topbar navigation entry pointing at `#target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Expression>,
}

/// A page element. Head documents hold `Title` / `Icon`; everything else
/// belongs in the body or a component body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Div {
        #[serde(default)]
        attrs: Attrs,
        #[serde(default)]
        content: Vec<Element>,
    },
    Section {
        #[serde(default)]
        attrs: Attrs,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<Expression>,
        #[serde(default)]
        content: Vec<Element>,
    },
    Paragraph {
        #[serde(default)]
        attrs: Attrs,
        text: Expression,
    },
    Heading {
        #[serde(default)]
        attrs: Attrs,
        level: u8,
        text: Expression,
    },
    Link {
        #[serde(default)]
        attrs: Attrs,
        url: Expression,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<Expression>,
    },
    Image {
        #[serde(default)]
        attrs: Attrs,
        path: Expression,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<Expression>,
    },
    Button {
        #[serde(default)]
        attrs: Attrs,
        text: Expression,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        onclick: Option<OnClick>,
    },
    Textbox {
        #[serde(default)]
        attrs: Attrs,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<Expression>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<Expression>,
        /// Render the label after the input instead of before it.
        #[serde(default)]
        label_after: bool,
    },
    Linebreak,
    Topbar {
        #[serde(default)]
        attrs: Attrs,
        title: Expression,
        /// Target of the home link; defaults to `#`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        home: Option<Expression>,
        #[serde(default)]
        links: Vec<NavLink>,
        /// Link every named section of the document instead of `links`.
        #[serde(default)]
        auto_nav_links: bool,
    },
    Footer {
        #[serde(default)]
        attrs: Attrs,
        text: Expression,
    },
    UseComponent {
        component: String,
        #[serde(default)]
        args: Vec<Expression>,
    },
    Title {
        text: Expression,
    },
    Icon {
        path: Expression,
    },
}

impl Element {
    pub fn paragraph(text: Expression) -> Self {
        Element::Paragraph { attrs: Attrs::default(), text }
    }

    pub fn div(attrs: Attrs, content: Vec<Element>) -> Self {
        Element::Div { attrs, content }
    }

    pub fn use_component(component: impl Into<String>, args: Vec<Expression>) -> Self {
        Element::UseComponent { component: component.into(), args }
    }

    /// Variant name, as spelled in the serialized form.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Div { .. } => "Div",
            Element::Section { .. } => "Section",
            Element::Paragraph { .. } => "Paragraph",
            Element::Heading { .. } => "Heading",
            Element::Link { .. } => "Link",
            Element::Image { .. } => "Image",
            Element::Button { .. } => "Button",
            Element::Textbox { .. } => "Textbox",
            Element::Linebreak => "Linebreak",
            Element::Topbar { .. } => "Topbar",
            Element::Footer { .. } => "Footer",
            Element::UseComponent { .. } => "UseComponent",
            Element::Title { .. } => "Title",
            Element::Icon { .. } => "Icon",
        }
    }

    /// Shared attributes, for the variants that carry them.
    pub fn attrs(&self) -> Option<&Attrs> {
        match self {
            Element::Div { attrs, .. }
            | Element::Section { attrs, .. }
            | Element::Paragraph { attrs, .. }
            | Element::Heading { attrs, .. }
            | Element::Link { attrs, .. }
            | Element::Image { attrs, .. }
            | Element::Button { attrs, .. }
            | Element::Textbox { attrs, .. }
            | Element::Topbar { attrs, .. }
            | Element::Footer { attrs, .. } => Some(attrs),
            Element::Linebreak
            | Element::UseComponent { .. }
            | Element::Title { .. }
            | Element::Icon { .. } => None,
        }
    }

    /// Nested children of container elements.
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Div { content, .. } | Element::Section { content, .. } => content,
            _ => &[],
        }
    }

    pub fn is_head_element(&self) -> bool {
        matches!(self, Element::Title { .. } | Element::Icon { .. })
    }
}

// ── Components ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Number,
    String,
}

impl ParamType {
    pub fn name(self) -> &'static str {
        match self {
            ParamType::Number => "number",
            ParamType::String => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A reusable body subtree, instantiated by [`Element::UseComponent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub body: Vec<Element>,
}

// ── Script ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    /// `alert(value)` popup.
    Alert { value: Expression },
    /// `const name = value`.
    Const { name: String, value: Expression },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub body: Vec<Statement>,
}

// ── Document ──────────────────────────────────────────────────────────────

/// The root of one SimpleUi source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub head: Vec<Element>,
    #[serde(default)]
    pub body: Vec<Element>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub functions: Vec<Function>,
    /// Top-level script statements, emitted after the functions.
    #[serde(default)]
    pub statements: Vec<Statement>,
    #[serde(default)]
    pub styles: Vec<StyleRule>,
}

impl Document {
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}
