extern crate shader_context;

mod support;

use shader_context::prelude::*;
use shader_context::video::backends::headless::Command;

use self::support::*;

#[test]
fn compile() {
    let mut ctx = setup();

    let shader = ctx.compile(VS, FS).unwrap();
    assert!(shader.is_valid());
    assert!(ctx.contains(shader));

    let id = ctx.program(shader).unwrap();
    let visitor = ctx.visitor();
    assert_eq!(visitor.programs(), 1);
    assert_eq!(visitor.stages(), 0);
    assert_eq!(
        visitor.program_attributes(id).unwrap(),
        &[(0, "a_position".to_owned()), (1, "a_texcoord".to_owned())]
    );
}

#[test]
fn compile_twice() {
    let mut ctx = setup();

    let s1 = ctx.compile(VS, FS).unwrap();
    let s2 = ctx.compile(VS, FS).unwrap();
    assert_ne!(s1, s2);
    assert_ne!(ctx.program(s1), ctx.program(s2));
    assert_eq!(ctx.visitor().programs(), 2);
}

#[test]
fn malformed_fragment() {
    let mut ctx = setup();

    let err = ctx.compile(VS, MALFORMED_FS).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::ShaderCreationFailure(log)) => {
            assert!(!log.is_empty());
            assert!(log.contains("Fragment"));
            assert!(!log.contains("Vertex"));
        }
        _ => panic!("unexpected error {}", err),
    }

    // The vertex stage compiled fine, and must not be leaked.
    assert_eq!(ctx.visitor().stages(), 0);
    assert_eq!(ctx.visitor().programs(), 0);
}

#[test]
fn malformed_stages() {
    let mut ctx = setup();

    let err = ctx.compile("", MALFORMED_FS).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::ShaderCreationFailure(log)) => {
            assert!(log.contains("Vertex"));
            assert!(log.contains("Fragment"));
        }
        _ => panic!("unexpected error {}", err),
    }

    assert_eq!(ctx.visitor().stages(), 0);
}

#[test]
fn link_failure() {
    let mut ctx = setup();

    let err = ctx.compile(VS, TINTED_FS).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::ShaderCreationFailure(log)) => {
            assert!(log.contains("v_color"));
        }
        _ => panic!("unexpected error {}", err),
    }

    assert_eq!(ctx.visitor().stages(), 0);
    assert_eq!(ctx.visitor().programs(), 0);
}

#[test]
fn inactive_projection() {
    let mut ctx = setup();

    let shader = ctx.compile(UNPROJECTED_VS, FS).unwrap();
    ctx.bind(shader).unwrap();

    let commands = ctx.visitor_mut().take_commands();
    assert!(commands.iter().any(|v| match v {
        Command::UniformMatrix4fv(-1, _) => true,
        _ => false,
    }));
    assert!(commands.contains(&Command::Uniform1i(0, 0)));
    ctx.unbind();
}

#[test]
fn compile_from_files() {
    let mut ctx = setup();

    let shader = ctx
        .compile_from_files("tests/assets/quad.vs", "tests/assets/grayscale.fs")
        .unwrap();
    assert!(ctx.contains(shader));

    let err = ctx
        .compile_from_files("tests/assets/quad.vs", "tests/assets/missing.fs")
        .unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::ShaderCreationFailure(_)) => {}
        _ => panic!("unexpected error {}", err),
    }

    assert_eq!(ctx.visitor().programs(), 1);
    assert_eq!(ctx.visitor().stages(), 0);
}

#[test]
fn bind_invalid() {
    let mut ctx = setup();
    ctx.visitor_mut().set_current_program(42);

    let err = ctx.bind(ShaderHandle::nil()).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::ShaderHandleInvalid(_)) => {}
        _ => panic!("unexpected error {}", err),
    }

    assert_eq!(ctx.visitor().program(), 42);
    assert!(ctx.visitor().commands().is_empty());

    // Nothing was recorded, so there is nothing to restore.
    ctx.unbind();
    assert!(ctx.visitor().commands().is_empty());
}

#[test]
fn bind_invalid_keeps_record() {
    let mut ctx = setup();
    ctx.visitor_mut().set_current_program(42);

    let shader = ctx.compile(VS, FS).unwrap();
    let id = ctx.program(shader).unwrap();

    ctx.bind(shader).unwrap();
    assert_eq!(ctx.visitor().program(), id);

    assert!(ctx.bind(ShaderHandle::nil()).is_err());
    assert_eq!(ctx.visitor().program(), id);

    ctx.unbind();
    assert_eq!(ctx.visitor().program(), 42);
}

#[test]
fn bind_released() {
    let mut ctx = setup();

    let shader = ctx.compile(VS, FS).unwrap();
    ctx.release();

    assert!(!ctx.contains(shader));
    assert!(ctx.bind(shader).is_err());
    assert_eq!(ctx.visitor().programs(), 0);
    assert_eq!(ctx.visitor().buffers(), 0);
}

#[test]
fn bind_and_unbind() {
    let mut ctx = setup();
    ctx.visitor_mut().set_current_program(7);

    let shader = ctx.compile(VS, FS).unwrap();
    let id = ctx.program(shader).unwrap();

    ctx.bind(shader).unwrap();
    assert_eq!(ctx.visitor().program(), id);

    let commands = ctx.visitor_mut().take_commands();
    assert_eq!(commands[0], Command::UseProgram(id));
    assert_eq!(commands[1], Command::Uniform1i(1, 0));
    match commands[2] {
        Command::UniformMatrix4fv(0, _) => {}
        ref v => panic!("unexpected command {:?}", v),
    }

    ctx.unbind();
    assert_eq!(ctx.visitor().program(), 7);
    assert_eq!(ctx.visitor_mut().take_commands(), vec![Command::UseProgram(7)]);

    // Restores exactly once per bind.
    ctx.unbind();
    assert_eq!(ctx.visitor().program(), 7);
    assert!(ctx.visitor().commands().is_empty());
}

#[test]
fn rebind_keeps_host_program() {
    let mut ctx = setup();
    ctx.visitor_mut().set_current_program(7);

    let s1 = ctx.compile(VS, FS).unwrap();
    let s2 = ctx.compile(VS, FS).unwrap();

    ctx.bind(s1).unwrap();
    ctx.bind(s2).unwrap();
    assert_eq!(ctx.visitor().program(), ctx.program(s2).unwrap());

    ctx.unbind();
    assert_eq!(ctx.visitor().program(), 7);
}

#[test]
fn unbind_to_no_program() {
    let mut ctx = setup();

    let shader = ctx.compile(VS, FS).unwrap();
    ctx.bind(shader).unwrap();
    ctx.unbind();
    assert_eq!(ctx.visitor().program(), 0);
}

#[test]
fn projection_orientation() {
    let mut ctx = setup();
    ctx.visitor_mut().set_viewport([0, 0, 800, 600]);

    let shader = ctx.compile(VS, FS).unwrap();

    ctx.bind(shader).unwrap();
    let window = ctx.projection();
    ctx.unbind();

    ctx.visitor_mut().set_framebuffer(3);
    ctx.bind(shader).unwrap();
    let target = ctx.projection();
    ctx.unbind();

    assert_eq!(window.x.x, target.x.x);
    assert_eq!(window.y.y, -target.y.y);
    assert_eq!(window.w.y, -target.w.y);
}

#[test]
fn params() {
    let _ = env_logger::try_init();

    let params = ShaderContextParams::from_json(r#"{ "buffers": 2 }"#).unwrap();
    let ctx = ShaderContext::initialize(HeadlessVisitor::new(), params).unwrap();
    assert_eq!(ctx.buffers().len(), 2);
    assert_eq!(ctx.visitor().buffers(), 2);

    let mut params = ShaderContextParams::default();
    params.buffers = 0;
    assert!(ShaderContext::initialize(HeadlessVisitor::new(), params).is_err());
}
