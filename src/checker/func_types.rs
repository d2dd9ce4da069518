use std::sync::Arc;

use lazy_static::lazy_static;

use crate::types::types::{FuncType, Type};

lazy_static! {
    /// Native call shapes the execution stage can dispatch without
    /// reflection. Index 0 is reserved and never matched.
    pub static ref FUNC_TYPES: Arc<Vec<FuncType>> = Arc::new(default_func_types());
}

fn f(ins: Vec<Type>, out: Type) -> FuncType {
    FuncType::new(ins, vec![out], false)
}

fn default_func_types() -> Vec<FuncType> {
    use Type::{Any, Bool, Duration, String, Time};

    let int = Type::INTEGER;
    let float = Type::FLOAT;
    let any_array = Type::any_array;
    let any_map = Type::any_map;

    vec![
        FuncType::new(vec![], vec![], false),
        f(vec![], Duration),
        f(vec![], Time),
        f(vec![], any_array()),
        f(vec![], Bool),
        f(vec![], float.clone()),
        f(vec![], int.clone()),
        f(vec![], Any),
        f(vec![], any_map()),
        f(vec![], String),
        f(vec![Duration], Duration),
        f(vec![Duration], Time),
        f(vec![Time], Duration),
        f(vec![Time], Bool),
        f(vec![any_array(), String], String),
        f(vec![Type::array_of(String), String], String),
        f(vec![Bool], Bool),
        f(vec![Bool], float.clone()),
        f(vec![Bool], int.clone()),
        f(vec![Bool], String),
        f(vec![float.clone()], Bool),
        f(vec![float.clone()], float.clone()),
        f(vec![float.clone()], int.clone()),
        f(vec![float.clone()], String),
        f(vec![int.clone()], Bool),
        f(vec![int.clone()], float.clone()),
        f(vec![int.clone()], int.clone()),
        f(vec![int.clone()], String),
        f(vec![int.clone(), int.clone()], int.clone()),
        f(vec![int.clone(), int.clone()], String),
        f(vec![String], Type::array_of(String)),
        f(vec![String], Bool),
        f(vec![String], float.clone()),
        f(vec![String], int.clone()),
        f(vec![String], String),
        f(vec![String, int.clone()], int.clone()),
        f(vec![String, String], Bool),
        f(vec![String, String], String),
        f(vec![Any], Bool),
        f(vec![Any], float),
        f(vec![Any], int),
        f(vec![Any], String),
        f(vec![Any], Any),
        f(vec![Any], any_array()),
        f(vec![Any], any_map()),
        f(vec![any_array()], Any),
        f(vec![any_array()], any_array()),
        f(vec![any_array()], any_map()),
        f(vec![Any, Any], Bool),
        f(vec![Any, Any], String),
        f(vec![Any, Any], Any),
        f(vec![Any, Any], any_array()),
    ]
}
