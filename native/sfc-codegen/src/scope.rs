use std::collections::HashSet;

lazy_static::lazy_static! {
    /// Public-instance properties every template can reach without declaring them.
    pub static ref INSTANCE_PROPERTIES: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("$attrs");
        s.insert("$slots");
        s.insert("$refs");
        s.insert("$props");
        s.insert("$emit");
        s.insert("$el");
        s.insert("$parent");
        s.insert("$root");
        s.insert("$data");
        s.insert("$options");
        s.insert("$nextTick");
        s.insert("$forceUpdate");
        s.insert("$watch");
        s
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// BINDING SET
// ═══════════════════════════════════════════════════════════════════════════════

/// Names visible in the component's setup scope. Membership only: inserting a
/// name twice, or in any order, yields the same set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingSet {
    names: HashSet<String>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set pre-seeded with the public-instance `$` properties.
    pub fn with_instance_properties() -> Self {
        let mut set = Self::new();
        set.extend(INSTANCE_PROPERTIES.iter().copied());
        set
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.insert(name);
        }
    }

    pub fn union(&mut self, other: &BindingSet) {
        self.names.extend(other.names.iter().cloned());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Sorted, for deterministic output.
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCOPE RESOLVER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Bound by an enclosing loop, slot, handler or function in the template.
    Local,
    /// Declared by the component; reached through the context object.
    Setup,
    /// Neither; a global or a typo, left for the checker.
    Unbound,
}

/// The setup [`BindingSet`] plus a stack of immutable frames of block-local names.
#[derive(Debug, Clone, Default)]
pub struct ScopeResolver {
    setup: BindingSet,
    frames: Vec<Box<[String]>>,
}

impl ScopeResolver {
    pub fn new(setup: BindingSet) -> Self {
        Self {
            setup,
            frames: Vec::new(),
        }
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.setup
    }

    pub fn push_frame<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let frame: Vec<String> = names.into_iter().map(Into::into).collect();
        self.frames.push(frame.into_boxed_slice());
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        if self
            .frames
            .iter()
            .rev()
            .any(|frame| frame.iter().any(|n| n == name))
        {
            Resolution::Local
        } else if self.setup.contains(name) {
            Resolution::Setup
        } else {
            Resolution::Unbound
        }
    }

    /// The setup binding a template tag refers to, trying the tag as written,
    /// then its camelCase and PascalCase spellings.
    pub fn resolve_component(&self, tag: &str) -> Option<String> {
        let camel = camelize(tag);
        let pascal = capitalize(&camel);
        [tag.to_string(), camel, pascal]
            .into_iter()
            .find(|candidate| self.setup.contains(candidate) && !is_instance_property(candidate))
    }
}

pub fn is_instance_property(name: &str) -> bool {
    INSTANCE_PROPERTIES.contains(name)
}

pub fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
