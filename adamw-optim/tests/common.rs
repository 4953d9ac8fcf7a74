use adamw_core::{ParamId, Parameter, Tensor};

// Helpers shared by the integration tests. Each test crate uses a subset.
#[allow(dead_code)]
pub fn param_f64(name: &str, data: Vec<f64>) -> Parameter {
    let shape = vec![data.len()];
    let tensor = Tensor::new_f64(data, shape).expect("Test tensor creation failed");
    Parameter::new(tensor, Some(name.to_string()))
}

#[allow(dead_code)]
pub fn set_grad_f64(param: &mut Parameter, data: Vec<f64>) {
    let shape = param.shape().to_vec();
    let grad = Tensor::new_f64(data, shape).expect("Test gradient creation failed");
    param.set_grad(grad).expect("Gradient shape should match");
}

#[allow(dead_code)]
pub fn ids(params: &[Parameter]) -> Vec<ParamId> {
    params.iter().map(Parameter::id).collect()
}
