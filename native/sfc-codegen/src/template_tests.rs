//! Template generation on hand-built template trees.

#[cfg(test)]
mod tests {
    use crate::builder::{BlockKind, Mapping};
    use crate::error::E_PARSE;
    use crate::ir::{
        AttributeProp, DirectiveArg, DirectiveProp, ElementNode, ElementType, InterpolationNode, PropNode,
        TemplateNode, TextNode, TextRange,
    };
    use crate::scope::{BindingSet, ScopeResolver};
    use crate::template::{generate_template, Helper, TemplateCodegen};

    fn nth(text: &str, needle: &str, n: usize) -> TextRange {
        let start = text.match_indices(needle).nth(n).unwrap().0;
        TextRange::new(start as u32, (start + needle.len()) as u32)
    }

    fn interp(text: &str, n: usize) -> TemplateNode {
        let open = text.match_indices("{{").nth(n).unwrap().0;
        let close = open + text[open..].find("}}").unwrap();
        let inner = &text[open + 2..close];
        let lead = inner.len() - inner.trim_start().len();
        let start = (open + 2 + lead) as u32;
        TemplateNode::Interpolation(InterpolationNode {
            content: TextRange::new(start, start + inner.trim().len() as u32),
            loc: TextRange::new(open as u32, (close + 2) as u32),
        })
    }

    fn element(
        text: &str,
        tag: &str,
        n: usize,
        tag_type: ElementType,
        props: Vec<PropNode>,
        children: Vec<TemplateNode>,
    ) -> TemplateNode {
        let open = nth(text, &format!("<{}", tag), n);
        TemplateNode::Element(ElementNode {
            tag: tag.to_string(),
            tag_type,
            props,
            children,
            loc: open,
        })
    }

    fn attr(text: &str, name: &str, value: &str) -> PropNode {
        let whole = nth(text, &format!("{}=\"{}\"", name, value), 0);
        let value_start = whole.start + name.len() as u32 + 2;
        PropNode::Attribute(AttributeProp {
            name: name.to_string(),
            value: Some(TextRange::new(value_start, value_start + value.len() as u32)),
            loc: whole,
        })
    }

    fn dir(name: &str, arg: Option<TextRange>, exp: Option<TextRange>) -> PropNode {
        PropNode::Directive(DirectiveProp {
            name: name.to_string(),
            arg: arg.map(|loc| DirectiveArg { loc, is_static: true }),
            exp,
            modifiers: Vec::new(),
            loc: exp.or(arg).unwrap_or_default(),
        })
    }

    fn generate(text: &str, nodes: &[TemplateNode], names: &[&str]) -> (String, Vec<Mapping>, TemplateCodegen) {
        let mut set = BindingSet::with_instance_properties();
        set.extend(names.iter().copied());
        let mut scope = ScopeResolver::new(set);
        let mut out = generate_template(text, nodes, &mut scope, "Test.vue").unwrap();
        assert_eq!(scope.depth(), 0);
        let (code, mappings) = std::mem::take(&mut out.code).finish();
        (code, mappings, out)
    }

    fn assert_mappings_round_trip(template: &str, code: &str, mappings: &[Mapping]) {
        for m in mappings {
            assert_eq!(m.block, BlockKind::Template);
            assert_eq!(
                m.virtual_range.slice(code),
                m.original_range.slice(template),
                "mapping {:?}",
                m
            );
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // EXPRESSIONS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_interpolation_is_prefixed_and_mapped() {
        let text = "{{ count + Math.PI }}";
        let (code, mappings, out) = generate(text, &[interp(text, 0)], &["count"]);
        assert_eq!(code, "(__VLS_ctx.count + Math.PI);\n");
        assert_eq!(out.accessed, vec!["count"]);
        assert!(!mappings.is_empty());
        assert_mappings_round_trip(text, &code, &mappings);
        let count = code.find("count").unwrap() as u32;
        assert!(mappings
            .iter()
            .any(|m| m.virtual_range.start <= count && m.original_range.start == 3));
    }

    #[test]
    fn test_parse_error_points_into_template() {
        let text = "<p>\n{{ a + }}</p>";
        let err = generate_template(
            text,
            &[interp(text, 0)],
            &mut ScopeResolver::new(BindingSet::new()),
            "Broken.vue",
        )
        .unwrap_err();
        assert_eq!(err.code, E_PARSE);
        assert_eq!(err.block.as_deref(), Some("template"));
        assert_eq!(err.line, 2);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // CONTROL FLOW
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_loop_variable_does_not_leak_to_sibling() {
        let text = "<li v-for=\"item in items\">{{ item }}</li><p>{{ item }}</p>";
        let nodes = vec![
            element(
                text,
                "li",
                0,
                ElementType::Element,
                vec![dir("for", None, Some(nth(text, "item in items", 0)))],
                vec![interp(text, 0)],
            ),
            element(text, "p", 0, ElementType::Element, vec![], vec![interp(text, 1)]),
        ];
        let (code, mappings, out) = generate(text, &nodes, &["item", "items"]);
        assert!(code.contains("for (const [item] of __VLS_vFor((__VLS_ctx.items))) {\n"));
        assert!(code.contains("(item);\n"));
        assert!(code.contains("(__VLS_ctx.item);\n"));
        assert!(out.helpers.contains(&Helper::VFor));
        assert_mappings_round_trip(text, &code, &mappings);
    }

    #[test]
    fn test_destructured_loop_alias() {
        let text = "<li v-for=\"({ id, label }, index) of rows\">{{ label }}{{ index }}{{ id }}</li>";
        let nodes = vec![element(
            text,
            "li",
            0,
            ElementType::Element,
            vec![dir("for", None, Some(nth(text, "({ id, label }, index) of rows", 0)))],
            vec![interp(text, 0), interp(text, 1), interp(text, 2)],
        )];
        let (code, _, _) = generate(text, &nodes, &["rows", "id", "label", "index"]);
        assert!(code.contains("for (const [{ id, label }, index] of __VLS_vFor((__VLS_ctx.rows)))"));
        assert!(!code.contains("__VLS_ctx.label"));
        assert!(!code.contains("__VLS_ctx.index"));
        assert!(!code.contains("__VLS_ctx.id"));
    }

    #[test]
    fn test_conditional_chain() {
        let text = "<a v-if=\"ok\"></a>\n  <!-- note -->\n<b v-else-if=\"maybe\"></b><i v-else></i><u v-if=\"ok\"></u>";
        let nodes = vec![
            element(text, "a", 0, ElementType::Element, vec![dir("if", None, Some(nth(text, "ok", 0)))], vec![]),
            TemplateNode::Text(TextNode { loc: nth(text, "\n  ", 0) }),
            TemplateNode::Comment(TextNode { loc: nth(text, "<!-- note -->", 0) }),
            element(
                text,
                "b",
                0,
                ElementType::Element,
                vec![dir("else-if", None, Some(nth(text, "maybe", 0)))],
                vec![],
            ),
            element(text, "i", 0, ElementType::Element, vec![dir("else", None, None)], vec![]),
            element(text, "u", 0, ElementType::Element, vec![dir("if", None, Some(nth(text, "ok", 1)))], vec![]),
        ];
        let (code, _, _) = generate(text, &nodes, &["ok", "maybe"]);
        assert!(code.starts_with("if (__VLS_ctx.ok) {\n__VLS_intrinsics['a']({ });\n}"));
        assert!(code.contains("} else if (__VLS_ctx.maybe) {\n__VLS_intrinsics['b']"));
        assert!(code.contains("} else {\n__VLS_intrinsics['i']"));
        assert_eq!(code.matches("if (__VLS_ctx.ok)").count(), 2);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // COMPONENTS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_component_props_and_events() {
        let text = "<MyComp :foo-bar=\"x\" @click=\"go\" title=\"Hi\" />";
        let nodes = vec![element(
            text,
            "MyComp",
            0,
            ElementType::Component,
            vec![
                dir("bind", Some(nth(text, "foo-bar", 0)), Some(nth(text, "x", 0))),
                dir("on", Some(nth(text, "click", 0)), Some(nth(text, "go", 0))),
                attr(text, "title", "Hi"),
            ],
            vec![],
        )];
        let (code, mappings, out) = generate(text, &nodes, &["MyComp", "x", "go"]);
        assert!(code.contains("const __VLS_0 = __VLS_asComponent(__VLS_ctx.MyComp);\n"));
        assert!(code.contains(
            "__VLS_0({ 'fooBar': (__VLS_ctx.x), 'onClick': (__VLS_ctx.go), 'title': \"Hi\", });\n"
        ));
        assert_eq!(out.component_tags, vec!["MyComp"]);
        assert!(out.accessed.contains(&"MyComp".to_string()));
        assert_mappings_round_trip(text, &code, &mappings);
    }

    #[test]
    fn test_same_name_shorthand_binding() {
        let text = "<MyComp :msg-text :count />";
        let nodes = vec![element(
            text,
            "MyComp",
            0,
            ElementType::Component,
            vec![
                dir("bind", Some(nth(text, "msg-text", 0)), None),
                dir("bind", Some(nth(text, "count", 0)), None),
            ],
            vec![],
        )];
        let (code, _, out) = generate(text, &nodes, &["MyComp", "msgText", "count"]);
        assert!(code.contains("__VLS_0({ 'msgText': (__VLS_ctx.msgText), 'count': (__VLS_ctx.count), });\n"));
        assert_eq!(out.accessed, vec!["MyComp", "msgText", "count"]);
    }

    #[test]
    fn test_unresolved_component_goes_through_registry() {
        let text = "<router-link to=\"/\" />";
        let nodes = vec![element(
            text,
            "router-link",
            0,
            ElementType::Component,
            vec![attr(text, "to", "/")],
            vec![],
        )];
        let (code, _, out) = generate(text, &nodes, &[]);
        assert!(code.contains("__VLS_asComponent(__VLS_components[\"router-link\"])"));
        assert!(out.helpers.contains(&Helper::Components));
    }

    #[test]
    fn test_kebab_tag_resolves_to_pascal_binding() {
        let text = "<my-comp />";
        let nodes = vec![element(text, "my-comp", 0, ElementType::Component, vec![], vec![])];
        let (code, _, out) = generate(text, &nodes, &["MyComp"]);
        assert!(code.contains("__VLS_asComponent(__VLS_ctx.MyComp)"));
        assert_eq!(out.accessed, vec!["MyComp"]);
    }

    #[test]
    fn test_inline_handler_binds_event() {
        let text = "<button @click=\"count++; emit('x', $event)\"></button>";
        let nodes = vec![element(
            text,
            "button",
            0,
            ElementType::Element,
            vec![dir("on", Some(nth(text, "click", 0)), Some(nth(text, "count++; emit('x', $event)", 0)))],
            vec![],
        )];
        let (code, _, _) = generate(text, &nodes, &["count", "emit"]);
        assert!(code.contains(
            "'onClick': (...[$event]) => {\n__VLS_ctx.count++; __VLS_ctx.emit('x', $event)\n}"
        ));
    }

    #[test]
    fn test_function_handlers_and_assignment_patterns() {
        let text = "<button @click=\"((a)) => go(a)\" @input=\"({ a } = b)\"></button>";
        let nodes = vec![element(
            text,
            "button",
            0,
            ElementType::Element,
            vec![
                dir("on", Some(nth(text, "click", 0)), Some(nth(text, "((a)) => go(a)", 0))),
                dir("on", Some(nth(text, "input", 0)), Some(nth(text, "({ a } = b)", 0))),
            ],
            vec![],
        )];
        let (code, mappings, out) = generate(text, &nodes, &["go", "a", "b"]);
        assert!(code.contains("'onClick': (((a)) => __VLS_ctx.go(a)), "));
        assert!(code.contains("'onInput': (...[$event]) => {\n({ a: __VLS_ctx.a } = __VLS_ctx.b)\n}"));
        assert_eq!(out.root_attrs.as_deref(), Some("__VLS_IntrinsicElements[\"button\"]"));
        assert_mappings_round_trip(text, &code, &mappings);
    }

    #[test]
    fn test_scoped_slot_binds_props() {
        let text = "<MyList v-slot=\"{ row }\">{{ row }}<template #footer=\"foot\">{{ foot.total }}</template></MyList>";
        let template = element(
            text,
            "template",
            0,
            ElementType::Template,
            vec![dir("slot", Some(nth(text, "footer", 0)), Some(nth(text, "foot", 1)))],
            vec![interp(text, 1)],
        );
        let nodes = vec![element(
            text,
            "MyList",
            0,
            ElementType::Component,
            vec![dir("slot", None, Some(nth(text, "{ row }", 0)))],
            vec![interp(text, 0), template],
        )];
        let (code, mappings, out) = generate(text, &nodes, &["MyList", "row", "foot"]);
        assert!(code.contains("const { row } = __VLS_slotProps(__VLS_0, 'default');\n(row);\n"));
        assert!(code.contains("const foot = __VLS_slotProps(__VLS_0, 'footer');\n(foot.total);\n"));
        assert!(out.helpers.contains(&Helper::SlotProps));
        assert_eq!(out.root_attrs.as_deref(), Some("__VLS_PropsOf<typeof __VLS_ctx.MyList>"));

        let as_component = Helper::AsComponent.declaration().unwrap();
        assert!(as_component.contains("& { readonly __VLS_slots: __VLS_SlotsOf<T> };\n"));
        let slot_props = Helper::SlotProps.declaration().unwrap();
        assert_eq!(
            slot_props,
            "declare function __VLS_slotProps<S, K extends PropertyKey>(component: { readonly __VLS_slots: S }, name: K): K extends keyof S ? NonNullable<S[K]> extends (props: infer P, ...args: any) => any ? P : any : any;\n"
        );
        assert_mappings_round_trip(text, &code, &mappings);
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SLOTS, REFS & DIRECTIVES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_slot_outlet_is_recorded() {
        let text = "<slot name=\"header\" :title=\"title\">fallback</slot><slot />";
        let nodes = vec![
            element(
                text,
                "slot",
                0,
                ElementType::Slot,
                vec![
                    attr(text, "name", "header"),
                    dir("bind", Some(nth(text, "title", 0)), Some(nth(text, "title", 1))),
                ],
                vec![TemplateNode::Text(TextNode { loc: nth(text, "fallback", 0) })],
            ),
            element(text, "slot", 1, ElementType::Slot, vec![], vec![]),
        ];
        let (code, _, out) = generate(text, &nodes, &["title"]);
        assert!(code.contains("var __VLS_slot_0 = { 'title': (__VLS_ctx.title), };\n"));
        let names: Vec<_> = out.slots.iter().map(|s| (s.name.as_str(), s.var.as_str())).collect();
        assert_eq!(names, vec![("header", "__VLS_slot_0"), ("default", "__VLS_slot_1")]);
    }

    #[test]
    fn test_refs_inside_loops_are_arrays() {
        let text = "<input ref=\"field\" /><div v-for=\"n in 3\" ref=\"cells\"></div>";
        let nodes = vec![
            element(text, "input", 0, ElementType::Element, vec![attr(text, "ref", "field")], vec![]),
            element(
                text,
                "div",
                0,
                ElementType::Element,
                vec![dir("for", None, Some(nth(text, "n in 3", 0))), attr(text, "ref", "cells")],
                vec![],
            ),
        ];
        let (code, _, out) = generate(text, &nodes, &[]);
        assert!(!code.contains("'ref'"));
        let refs: Vec<_> = out
            .template_refs
            .iter()
            .map(|r| (r.name.as_str(), r.type_text.as_str()))
            .collect();
        assert_eq!(
            refs,
            vec![
                ("field", "__VLS_Elements[\"input\"]"),
                ("cells", "(__VLS_Elements[\"div\"])[]"),
            ]
        );
    }

    #[test]
    fn test_custom_directive_and_show() {
        let text = "<input v-focus v-show=\"visible\" />";
        let nodes = vec![element(
            text,
            "input",
            0,
            ElementType::Element,
            vec![dir("focus", None, None), dir("show", None, Some(nth(text, "visible", 0)))],
            vec![],
        )];
        let (code, _, out) = generate(text, &nodes, &["vFocus", "visible"]);
        assert!(code.contains("__VLS_ctx.vFocus;\n(__VLS_ctx.visible);\n"));
        assert_eq!(out.accessed, vec!["vFocus", "visible"]);
    }

    #[test]
    fn test_dollar_properties_in_template() {
        let text = "{{ $attrs.id }}";
        let (_, _, out) = generate(text, &[interp(text, 0)], &[]);
        assert_eq!(out.dollar, vec!["$attrs"]);
    }
}
