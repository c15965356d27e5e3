//! Classification behaviour on real parsed template expressions.

#[cfg(test)]
mod tests {
    use crate::builder::{splice, BlockKind};
    use crate::classify::{classify, Classification, ClassifiedExpression, CTX_PREFIX};
    use crate::scope::{BindingSet, ScopeResolver};
    use crate::syntax::{parse_expression, parse_statements};

    fn scope(names: &[&str]) -> ScopeResolver {
        let mut set = BindingSet::with_instance_properties();
        set.extend(names.iter().copied());
        ScopeResolver::new(set)
    }

    fn run(code: &str, names: &[&str]) -> (String, ClassifiedExpression) {
        let tree = parse_expression(code, 0).unwrap();
        let mut scope = scope(names);
        let out = classify(&tree, &mut scope);
        let text = splice(code, 0, BlockKind::Template, out.edits.clone())
            .into_iter()
            .map(|s| s.text)
            .collect();
        (text, out)
    }

    fn rewrite(code: &str, names: &[&str]) -> String {
        run(code, names).0
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // TYPE POSITIONS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_type_literal_inside_type_arguments_is_untouched() {
        let (text, out) = run(
            "(item as Extract<typeof item, { slot: string; }>)",
            &["item", "slot", "Extract"],
        );
        assert_eq!(text, "(__VLS_ctx.item as Extract<typeof item, { slot: string; }>)");
        assert!(text.contains("Extract<"));
        assert!(text.contains("{ slot: string; }"));
        assert!(!text.contains("__VLS_ctx.slot"));

        let slot = out.identifiers.iter().find(|i| i.name == "slot").unwrap();
        assert_eq!(slot.class, Classification::TypeName);
    }

    #[test]
    fn test_method_signature_is_untouched() {
        let text = rewrite("(x as { bar(arg: string): void })", &["x", "bar", "arg"]);
        assert_eq!(text, "(__VLS_ctx.x as { bar(arg: string): void })");
    }

    #[test]
    fn test_index_signature_and_keyof() {
        assert_eq!(
            rewrite("(m as { [k: string]: Foo })", &["m", "k", "Foo"]),
            "(__VLS_ctx.m as { [k: string]: Foo })"
        );
        assert_eq!(rewrite("(k as keyof Foo)", &["k", "Foo"]), "(__VLS_ctx.k as keyof Foo)");
    }

    #[test]
    fn test_call_type_arguments_stay_type_names() {
        assert_eq!(
            rewrite("useFoo<Foo>(bar)", &["useFoo", "Foo", "bar"]),
            "__VLS_ctx.useFoo<Foo>(__VLS_ctx.bar)"
        );
        assert_eq!(
            rewrite("(opts satisfies Options)", &["opts", "Options"]),
            "(__VLS_ctx.opts satisfies Options)"
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // COMPUTED KEYS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_computed_key_in_type_literal_is_a_value() {
        assert_eq!(
            rewrite("(x as { [key]: Foo })", &["x", "key", "Foo"]),
            "(__VLS_ctx.x as { [__VLS_ctx.key]: Foo })"
        );
    }

    #[test]
    fn test_computed_key_in_doubly_nested_type_literal_is_a_value() {
        assert_eq!(
            rewrite(
                "(x as { outer: { [sym]: { deep: Foo } } })",
                &["x", "outer", "sym", "deep", "Foo"]
            ),
            "(__VLS_ctx.x as { outer: { [__VLS_ctx.sym]: { deep: Foo } } })"
        );
    }

    #[test]
    fn test_computed_key_inside_computed_key() {
        assert_eq!(
            rewrite("(x as { [map[k]]: T })", &["x", "map", "k", "T"]),
            "(__VLS_ctx.x as { [__VLS_ctx.map[__VLS_ctx.k]]: T })"
        );
        assert_eq!(
            rewrite("{ [name]: value }", &["name", "value"]),
            "{ [__VLS_ctx.name]: __VLS_ctx.value }"
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // VALUE POSITIONS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_shorthand_property_is_expanded() {
        assert_eq!(
            rewrite("{ foo: bar, baz }", &["foo", "bar", "baz"]),
            "{ foo: __VLS_ctx.bar, baz: __VLS_ctx.baz }"
        );
        // Not a setup binding: nothing to expand.
        assert_eq!(rewrite("{ foo: bar, baz }", &["bar"]), "{ foo: __VLS_ctx.bar, baz }");
    }

    #[test]
    fn test_shorthand_assignment_target_is_expanded() {
        let code = "({ a, b: c, d = 1, e } = src)";
        let tree = parse_statements(code, 0).unwrap();
        let mut scope = scope(&["a", "c", "d", "src"]);
        let out = classify(&tree, &mut scope);
        let text: String = splice(code, 0, BlockKind::Template, out.edits)
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(
            text,
            "({ a: __VLS_ctx.a, b: __VLS_ctx.c, d: __VLS_ctx.d = 1, e } = __VLS_ctx.src)"
        );
        assert_eq!(out.accessed, vec!["a", "c", "d", "src"]);
    }

    #[test]
    fn test_only_access_chain_roots_are_prefixed() {
        assert_eq!(
            rewrite("foo.bar[baz].qux", &["foo", "bar", "baz", "qux"]),
            "__VLS_ctx.foo.bar[__VLS_ctx.baz].qux"
        );
        assert_eq!(rewrite("Math.max(a, 1)", &["a"]), "Math.max(__VLS_ctx.a, 1)");
    }

    #[test]
    fn test_arrow_parameters_shadow_setup_bindings() {
        let (text, out) = run(
            "items.map((item: Item) => item.id + offset)",
            &["items", "item", "offset", "Item"],
        );
        assert_eq!(text, "__VLS_ctx.items.map((item: Item) => item.id + __VLS_ctx.offset)");
        assert_eq!(out.accessed, vec!["items", "offset"]);
    }

    #[test]
    fn test_dollar_properties_are_tracked() {
        let (text, out) = run("$attrs.class || $slots.default", &[]);
        assert_eq!(text, "__VLS_ctx.$attrs.class || __VLS_ctx.$slots.default");
        assert_eq!(out.dollar, vec!["$attrs", "$slots"]);
    }

    #[test]
    fn test_every_bound_value_is_prefixed_exactly_once() {
        let code = "a + b.a + (c as A) + { a }.a";
        let names = ["a", "b", "c", "A"];
        let (text, out) = run(code, &names);
        for id in &out.identifiers {
            match id.class {
                Classification::Value => assert!(id.prefixed, "{} should be prefixed", id.name),
                Classification::TypeName => assert!(!id.prefixed),
            }
        }
        assert_eq!(text.matches(CTX_PREFIX).count(), 4);
        assert!(!text.contains("__VLS_ctx.A"));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let code = "list.filter(x => x.on).map(x => fmt<T>(x, { key }))";
        let names = ["list", "fmt", "T", "key"];
        let (first, a) = run(code, &names);
        let (second, b) = run(code, &names);
        assert_eq!(first, second);
        assert_eq!(a.identifiers, b.identifiers);
    }
}
