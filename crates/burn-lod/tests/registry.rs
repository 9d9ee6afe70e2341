use burn_lod::{
    registry::{grad_var_name, Attribute, MetaScope, OpDesc, OpRegistry, Scope, SEQ_EXPAND},
    Error, LodTensor,
};

fn forward_desc(repeat: i64) -> OpDesc {
    OpDesc::new(SEQ_EXPAND)
        .with_input("X", "x")
        .with_output("Out", "out")
        .with_attr("repeat", Attribute::Int(repeat))
}

#[test]
fn should_run_forward_and_gradient() {
    let registry = OpRegistry::<f32>::with_sequence_ops();
    let mut scope = Scope::new();
    scope.insert(
        "x",
        LodTensor::from_rows(vec![1.0, 2.0, 3.0], [3], vec![vec![0, 1, 2, 3]]).unwrap(),
    );

    let forward = forward_desc(2);
    registry.run(&forward, &mut scope).unwrap();

    let out = scope.var("out").unwrap();
    assert_eq!(out.to_vec(), vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
    assert_eq!(out.lod().level(0), Some(&[0, 2, 4, 6][..]));

    let out_grad = LodTensor::from_rows(
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        [6],
        out.lod().clone(),
    )
    .unwrap();
    scope.insert(grad_var_name("out"), out_grad);

    let backward = registry.grad_op_desc(&forward).unwrap();
    registry.run(&backward, &mut scope).unwrap();

    let grad = scope.var(&grad_var_name("x")).unwrap();
    assert_eq!(grad.to_vec(), vec![3.0, 7.0, 11.0]);
}

#[test]
fn should_repeat_by_reference_when_repeat_is_zero() {
    let registry = OpRegistry::<f32>::with_sequence_ops();
    let mut scope = Scope::new();
    scope.insert(
        "x",
        LodTensor::from_rows(vec![1.0, 2.0, 3.0], [3], vec![vec![0, 1, 2, 3]]).unwrap(),
    );
    scope.insert(
        "y",
        LodTensor::zeros([5], vec![vec![0, 2, 2, 5]]).unwrap(),
    );

    let forward = forward_desc(0).with_input("Y", "y");
    registry.run(&forward, &mut scope).unwrap();

    let out = scope.var("out").unwrap();
    assert_eq!(out.to_vec(), vec![1.0, 1.0, 3.0, 3.0, 3.0]);
    assert_eq!(out.lod().level(0), Some(&[0, 2, 2, 5][..]));
}

#[test]
fn should_fail_in_reference_mode_without_reference() {
    let registry = OpRegistry::<f32>::with_sequence_ops();
    let mut scope = Scope::new();
    scope.insert(
        "x",
        LodTensor::from_rows(vec![1.0, 2.0, 3.0], [3], vec![vec![0, 1, 2, 3]]).unwrap(),
    );

    let err = registry.run(&forward_desc(0), &mut scope).unwrap_err();

    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(!scope.contains("out"));
}

#[test]
fn should_fail_without_input() {
    let registry = OpRegistry::<f32>::with_sequence_ops();
    let mut scope = Scope::new();

    let err = registry.run(&forward_desc(2), &mut scope).unwrap_err();

    assert!(err.to_string().contains("x is not in the scope"));
}

#[test]
fn should_infer_shapes_of_forward_and_gradient() {
    let registry = OpRegistry::<f32>::with_sequence_ops();
    let x = LodTensor::<f32>::zeros([3, 4], vec![vec![0, 1, 3]]).unwrap();
    let mut metas = MetaScope::new();
    metas.insert("x".to_string(), x.meta());

    let forward = forward_desc(3);
    registry.infer_shape(&forward, &mut metas).unwrap();

    let out = metas["out"].clone();
    assert_eq!(out.shape.dims, vec![9, 4]);
    assert_eq!(out.lod.level(0), Some(&[0, 3, 9][..]));

    metas.insert(grad_var_name("out"), out);
    let backward = registry.grad_op_desc(&forward).unwrap();
    registry.infer_shape(&backward, &mut metas).unwrap();

    assert_eq!(metas[&grad_var_name("x")], x.meta());
}
