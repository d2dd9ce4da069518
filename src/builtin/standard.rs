use crate::{
    errors::errors::ErrorImpl,
    types::{
        lattice::{is_any, is_array, is_bool, is_map, is_string, strip_pointers},
        types::{FuncType, Type},
    },
};

use super::member::{
    ArgumentKind::{Closure, Expression},
    BuiltinCall, ExternVisitor, Info, Member, Namespace,
};

pub fn std_namespace() -> Namespace {
    Namespace::new(
        "",
        vec![
            Member::function("len", &[Expression], check_len),
            Member::function("all", &[Expression, Closure], check_reducer),
            Member::function("none", &[Expression, Closure], check_reducer),
            Member::function("any", &[Expression, Closure], check_reducer),
            Member::function("one", &[Expression, Closure], check_reducer),
            Member::function("filter", &[Expression, Closure], check_filter),
            Member::function("map", &[Expression, Closure], check_map),
            Member::function("count", &[Expression, Closure], check_count),
        ],
    )
}

fn check_len(v: &mut dyn ExternVisitor, call: &BuiltinCall) -> (Type, Info) {
    let [argument] = call.arguments else {
        return v.error(
            call.id,
            ErrorImpl::BuiltinArity {
                builtin: call.qualified_name(),
                expected: "one argument".to_string(),
            },
        );
    };

    let (param, _) = v.visit(*argument);

    if is_array(&param) || is_map(&param) || is_string(&param) {
        return (Type::INTEGER, Info::default());
    }
    if is_any(&param) {
        return (Type::Any, Info::default());
    }

    v.error(
        call.id,
        ErrorImpl::InvalidLenArgument {
            received: param.to_string(),
        },
    )
}

/// Shared shape of the collection builtins: an array (or `Any`) and a
/// closure checked with the array's elements as `#`. Returns the
/// collection and the closure's output, or the error result.
fn check_collection(
    v: &mut dyn ExternVisitor,
    call: &BuiltinCall,
) -> Result<(Type, Type), (Type, Info)> {
    let [collection, closure] = call.arguments else {
        return Err(v.error(
            call.id,
            ErrorImpl::BuiltinArity {
                builtin: call.qualified_name(),
                expected: "an array and a closure".to_string(),
            },
        ));
    };

    let (collection_type, _) = v.visit(*collection);
    if !is_array(&collection_type) && !is_any(&collection_type) {
        return Err(v.error(
            *collection,
            ErrorImpl::BuiltinTakesArray {
                builtin: call.qualified_name(),
                received: collection_type.to_string(),
            },
        ));
    }

    v.push_collection(collection_type.clone());
    let (closure_type, _) = v.visit(*closure);
    v.pop_collection();

    match closure_type.as_func().and_then(closure_output) {
        Some(output) => Ok((collection_type, output)),
        None => Err(v.error(*closure, ErrorImpl::ClosureSignature)),
    }
}

fn closure_output(func: &FuncType) -> Option<Type> {
    match (func.ins.as_slice(), func.outs.as_slice()) {
        ([input], [output]) if is_any(input) => Some(output.clone()),
        _ => None,
    }
}

fn require_bool_output(
    v: &mut dyn ExternVisitor,
    call: &BuiltinCall,
    output: &Type,
) -> Result<(), (Type, Info)> {
    if is_bool(output) || is_any(output) {
        return Ok(());
    }

    let closure = call.arguments.get(1).copied().unwrap_or(call.id);
    Err(v.error(
        closure,
        ErrorImpl::ClosureShouldReturnBool {
            received: output.to_string(),
        },
    ))
}

/// `all`, `none`, `any` and `one`.
fn check_reducer(v: &mut dyn ExternVisitor, call: &BuiltinCall) -> (Type, Info) {
    let output = match check_collection(v, call) {
        Ok((_, output)) => output,
        Err(error) => return error,
    };
    if let Err(error) = require_bool_output(v, call, &output) {
        return error;
    }

    (Type::Bool, Info::default())
}

fn check_filter(v: &mut dyn ExternVisitor, call: &BuiltinCall) -> (Type, Info) {
    let (collection, output) = match check_collection(v, call) {
        Ok(checked) => checked,
        Err(error) => return error,
    };
    if let Err(error) = require_bool_output(v, call, &output) {
        return error;
    }

    match strip_pointers(&collection).elem() {
        Some(elem) if !is_any(&collection) => (Type::array_of(elem.clone()), Info::default()),
        _ => (Type::any_array(), Info::default()),
    }
}

fn check_map(v: &mut dyn ExternVisitor, call: &BuiltinCall) -> (Type, Info) {
    match check_collection(v, call) {
        Ok((_, output)) => (Type::array_of(output), Info::default()),
        Err(error) => error,
    }
}

fn check_count(v: &mut dyn ExternVisitor, call: &BuiltinCall) -> (Type, Info) {
    let output = match check_collection(v, call) {
        Ok((_, output)) => output,
        Err(error) => return error,
    };
    if let Err(error) = require_bool_output(v, call, &output) {
        return error;
    }

    (Type::INTEGER, Info::default())
}
