//! Itanium-style symbol mangling with substitution compression.
//!
//! One mangling invocation covers one symbol and owns one fresh
//! [`SubstitutionTable`]. The emitted string doubles as the lookup key for
//! dynamic symbol resolution, so it has to match the target binary's ABI
//! byte for byte — including the handful of hard-coded standard-library
//! instantiations the binary was linked against.

use bindforge_model::{Primitive, TypeDescriptor, TypeExpr};

/// Result of mangling one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MangledSymbol {
    /// The full mangled symbol, native prefix included.
    pub symbol: String,
    /// Spellings of malformed type descriptors encountered along the way.
    /// Each was mangled as the void placeholder.
    pub malformed: Vec<String>,
}

/// Mangles `qualified_name(parameter_types)`.
///
/// Deterministic: the same inputs always produce the same bytes. An empty
/// parameter list encodes as the single no-parameter code `v`.
pub fn mangle<'a>(
    qualified_name: &str,
    parameter_types: impl IntoIterator<Item = &'a TypeDescriptor>,
) -> MangledSymbol {
    let mut mangler = Mangler::new();
    let name = mangler.encode_name(qualified_name);

    let mut params = String::new();
    let mut count = 0usize;
    for descriptor in parameter_types {
        params.push_str(&mangler.mangle_type(descriptor.expr(), true));
        count += 1;
    }
    if count == 0 {
        params.push('v');
    }

    MangledSymbol {
        symbol: format!("_Z{name}{params}"),
        malformed: mangler.malformed,
    }
}

/// Ordered table of previously emitted mangled fragments.
///
/// Insertion order is preserved, a fragment registers at most once, and
/// lookup is by exact string equality with the first matching index
/// deciding the back-reference.
#[derive(Debug, Default)]
pub struct SubstitutionTable {
    entries: Vec<String>,
}

impl SubstitutionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the back-reference token for a fragment, if registered.
    #[must_use]
    pub fn back_reference(&self, fragment: &str) -> Option<String> {
        self.entries
            .iter()
            .position(|entry| entry == fragment)
            .map(encode_back_reference)
    }

    /// Compresses a fragment: a registered fragment becomes its
    /// back-reference; an unseen one is returned as-is, and registered
    /// when `register` is set. Probing passes keep `register` off so they
    /// never mutate the table.
    pub fn intern(&mut self, fragment: String, register: bool) -> String {
        if fragment.is_empty() {
            return fragment;
        }
        if let Some(token) = self.back_reference(&fragment) {
            return token;
        }
        if register {
            self.entries.push(fragment.clone());
        }
        fragment
    }

    /// Number of registered fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Encodes a zero-based table index as a back-reference token: the first
/// entry is `S_`, entry N is `S<base36(N-1)>_` in uppercase digits.
fn encode_back_reference(index: usize) -> String {
    if index == 0 {
        "S_".to_string()
    } else {
        format!("S{}_", to_base36(index as u32 - 1))
    }
}

/// Plain radix conversion, uppercase digits, no padding.
fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut reversed = String::new();
    loop {
        reversed.push(DIGITS[(value % 36) as usize] as char);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    reversed.chars().rev().collect()
}

fn length_prefixed(segment: &str) -> String {
    format!("{}{}", segment.len(), segment)
}

struct Mangler {
    table: SubstitutionTable,
    malformed: Vec<String>,
}

impl Mangler {
    fn new() -> Self {
        Self {
            table: SubstitutionTable::new(),
            malformed: Vec::new(),
        }
    }

    /// Encodes the function name. Multi-segment names go through the
    /// nested-name encoder so every accumulated prefix becomes a
    /// substitution candidate for the parameter types that follow.
    fn encode_name(&mut self, qualified: &str) -> String {
        let segments: Vec<String> = qualified.split("::").map(str::to_string).collect();
        if segments.len() == 1 {
            length_prefixed(&segments[0])
        } else {
            self.nested_name(&segments, true)
        }
    }

    /// Nested-name encoding with per-prefix substitution. The lookup key
    /// is the uncompressed concatenation so far; the running result keeps
    /// whatever compressed spelling the table handed back. The final form
    /// is wrapped in `N…E` unless it collapsed to a bare substitution
    /// token.
    fn nested_name(&mut self, segments: &[String], register: bool) -> String {
        let mut uncompressed = String::new();
        let mut compressed = String::new();
        for segment in segments {
            let part = length_prefixed(segment);
            uncompressed.push_str(&part);
            if let Some(token) = self.table.back_reference(&uncompressed) {
                compressed = token;
            } else {
                compressed.push_str(&part);
                compressed = self.table.intern(compressed, register);
            }
        }
        if compressed.len() == 3 && compressed.starts_with('S') {
            compressed
        } else {
            format!("N{compressed}E")
        }
    }

    fn mangle_type(&mut self, expr: &TypeExpr, register: bool) -> String {
        match expr {
            TypeExpr::Primitive(primitive) => primitive_code(*primitive).to_string(),
            TypeExpr::Named(segments) => {
                let path = segments.join("::");
                if let Some(code) = self.alias(&path, register) {
                    return code;
                }
                if segments.len() > 1 {
                    self.nested_name(segments, register)
                } else {
                    self.table.intern(length_prefixed(&segments[0]), register)
                }
            }
            TypeExpr::Pointer(inner) => self.indirect('P', inner, register),
            TypeExpr::Reference(inner) => self.indirect('R', inner, register),
            TypeExpr::Const(inner) => {
                let mangled = self.mangle_type(inner, register);
                self.table.intern(format!("K{mangled}"), register)
            }
            TypeExpr::Malformed(text) => {
                if register {
                    self.malformed.push(text.clone());
                }
                "v".to_string()
            }
        }
    }

    /// Pointer/reference encoding. The ABI registers the pointee before
    /// the pointer, so a naive single pass would get the order wrong when
    /// the pointee recurs: first probe with a side-effect-free pass,
    /// back-reference on a hit, and only mangle for real on a miss.
    fn indirect(&mut self, prefix: char, inner: &TypeExpr, register: bool) -> String {
        let probe = self.mangle_type(inner, false);
        if let Some(token) = self.table.back_reference(&format!("{prefix}{probe}")) {
            return token;
        }
        let mangled = self.mangle_type(inner, register);
        self.table.intern(format!("{prefix}{mangled}"), register)
    }

    /// Fixed engine/string instantiations whose mangling must match the
    /// standard library build the target binary links against.
    fn alias(&mut self, path: &str, register: bool) -> Option<String> {
        match path {
            "gx::string" => Some("Ss".to_string()),
            "gx::map<gx::string, gx::string>" => {
                Some("St3mapISsSsSt4lessISsESaISt4pairIKSsSsEEE".to_string())
            }
            "vane::ColorRGB" => {
                Some(self.mangle_type(&TypeExpr::parse("vane::_ColorRGB"), register))
            }
            // Legacy callback: a pointer-to-member-function in the ABI,
            // with the function type and the member pointer registered as
            // two independent entries.
            "vane::MenuHandler" => {
                let class = self.mangle_type(&TypeExpr::parse("vane::Object"), register);
                let arg = self.mangle_type(&TypeExpr::parse("vane::Object*"), register);
                let fn_type = self.table.intern(format!("Fv{arg}E"), register);
                Some(self.table.intern(format!("M{class}{fn_type}"), register))
            }
            _ => None,
        }
    }
}

fn primitive_code(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Int => "i",
        Primitive::Float => "f",
        Primitive::Bool => "b",
        Primitive::Char => "c",
        Primitive::Void => "v",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(spellings: &[&str]) -> Vec<TypeDescriptor> {
        spellings.iter().map(|s| TypeDescriptor::new(*s)).collect()
    }

    #[test]
    fn test_no_parameters_encodes_void() {
        let mangled = mangle("ns::Widget::tick", &types(&[]));
        assert_eq!(mangled.symbol, "_ZN2ns6Widget4tickEv");
        assert!(mangled.malformed.is_empty());
    }

    #[test]
    fn test_single_segment_name() {
        let mangled = mangle("frobnicate", &types(&["int"]));
        assert_eq!(mangled.symbol, "_Z10frobnicatei");
    }

    #[test]
    fn test_primitive_parameters() {
        let mangled = mangle("ns::Widget::poke", &types(&["int", "float", "bool", "char"]));
        assert_eq!(mangled.symbol, "_ZN2ns6Widget4pokeEifbc");
    }

    #[test]
    fn test_mangle_is_deterministic() {
        let params = types(&["vane::Node*", "const gx::string&", "vane::Node*"]);
        let first = mangle("vane::MenuLayer::init", &params);
        let second = mangle("vane::MenuLayer::init", &params);
        assert_eq!(first.symbol, second.symbol);
    }

    #[test]
    fn test_repeated_pointer_parameter_back_references() {
        let mangled = mangle("Foo::Bar::set", &types(&["Foo::Bar*", "Foo::Bar*"]));
        // The class prefix is already substitution-registered by the name
        // encoding, so the pointee collapses to S0_ and the second pointer
        // parameter to a back-reference of the whole pointer entry.
        assert_eq!(mangled.symbol, "_ZN3Foo3Bar3setEPS0_S2_");
    }

    #[test]
    fn test_const_reference_registers_bare_inner() {
        let mangled = mangle("ns::Widget::store", &types(&["const Foo&", "Foo"]));
        // RK3Foo, with 3Foo registered on its own so the second parameter
        // is a back-reference.
        assert_eq!(mangled.symbol, "_ZN2ns6Widget5storeERK3FooS2_");
    }

    #[test]
    fn test_pointer_into_owning_namespace() {
        let mangled = mangle("vane::MenuLayer::init", &types(&["vane::Node*"]));
        assert_eq!(mangled.symbol, "_ZN4vane9MenuLayer4initEPNS_4NodeE");
    }

    #[test]
    fn test_managed_string_alias() {
        let mangled = mangle("vane::Label::setText", &types(&["const gx::string&"]));
        assert_eq!(mangled.symbol, "_ZN4vane5Label7setTextERKSs");
    }

    #[test]
    fn test_string_map_alias_is_literal() {
        let mangled = mangle(
            "vane::Dict::assign",
            &types(&["gx::map<gx::string, gx::string>"]),
        );
        assert_eq!(
            mangled.symbol,
            "_ZN4vane4Dict6assignESt3mapISsSsSt4lessISsESaISt4pairIKSsSsEEE"
        );
    }

    #[test]
    fn test_color_aggregate_one_level_alias() {
        let mangled = mangle("vane::Sprite::setColor", &types(&["vane::ColorRGB"]));
        assert_eq!(mangled.symbol, "_ZN4vane6Sprite8setColorENS_9_ColorRGBE");
    }

    #[test]
    fn test_menu_handler_is_member_function_pointer() {
        let mangled = mangle("vane::MenuItem::setCallback", &types(&["vane::MenuHandler"]));
        assert_eq!(
            mangled.symbol,
            "_ZN4vane8MenuItem11setCallbackEMNS_6ObjectEFvPS2_E"
        );
    }

    #[test]
    fn test_menu_handler_repeat_back_references_components() {
        // The table is keyed by fragment spelling, so a repeated callback
        // re-emits the member-pointer shell while its class and pointer
        // components collapse to back-references.
        let mangled = mangle(
            "vane::MenuItem::setCallbacks",
            &types(&["vane::MenuHandler", "vane::MenuHandler"]),
        );
        assert_eq!(
            mangled.symbol,
            "_ZN4vane8MenuItem12setCallbacksEMNS_6ObjectEFvPS2_EMS2_FvS3_E"
        );
    }

    #[test]
    fn test_malformed_const_mangles_to_placeholder() {
        let mangled = mangle("vane::Widget::poke", &types(&["unsigned const int"]));
        assert_eq!(mangled.symbol, "_ZN4vane6Widget4pokeEv");
        assert_eq!(mangled.malformed, vec!["unsigned const int".to_string()]);
    }

    #[test]
    fn test_back_reference_encoding() {
        assert_eq!(encode_back_reference(0), "S_");
        assert_eq!(encode_back_reference(1), "S0_");
        assert_eq!(encode_back_reference(10), "S9_");
        assert_eq!(encode_back_reference(11), "SA_");
        assert_eq!(encode_back_reference(36), "SZ_");
        assert_eq!(encode_back_reference(37), "S10_");
    }

    #[test]
    fn test_base36_rendering() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36), "100");
    }

    #[test]
    fn test_substitution_table_registers_once() {
        let mut table = SubstitutionTable::new();
        assert_eq!(table.intern("3Foo".to_string(), true), "3Foo");
        assert_eq!(table.intern("3Foo".to_string(), true), "S_");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_probe_does_not_register() {
        let mut table = SubstitutionTable::new();
        assert_eq!(table.intern("3Foo".to_string(), false), "3Foo");
        assert!(table.is_empty());
    }
}
