use crate::{
    errors::errors::ErrorImpl,
    types::{
        lattice::{is_any, is_number},
        types::Type,
    },
};

use super::member::{ArgumentKind::Expression, BuiltinCall, ExternVisitor, Info, Member, Namespace};

pub fn math_namespace() -> Namespace {
    Namespace::new(
        "math",
        vec![
            Member::function("abs", &[Expression], check_abs),
            Member::constant("pi", check_pi),
        ],
    )
}

/// Same numeric kind in, same kind out.
fn check_abs(v: &mut dyn ExternVisitor, call: &BuiltinCall) -> (Type, Info) {
    let [argument] = call.arguments else {
        return v.error(
            call.id,
            ErrorImpl::BuiltinArity {
                builtin: call.qualified_name(),
                expected: "one number".to_string(),
            },
        );
    };

    let (param, _) = v.visit(*argument);

    if is_number(&param) || is_any(&param) {
        return (param, Info::default());
    }

    v.error(
        call.id,
        ErrorImpl::BuiltinArgumentType {
            builtin: call.qualified_name(),
            expected: "a number".to_string(),
            received: param.to_string(),
        },
    )
}

fn check_pi(_: &mut dyn ExternVisitor, _: &BuiltinCall) -> (Type, Info) {
    (Type::FLOAT, Info::default())
}
