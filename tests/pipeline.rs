use linelab::math::{PI, Rotation, Vec2, Vec3};
use linelab::{
    Camera, ClipResult, Command, CommandLog, DrawOutcome, DrawingContext, ParseError,
    RecordingSurface, Turn, Turtle2d, Turtle3d, clip_line, load_program,
};

fn lab_camera() -> Camera {
    Camera::new(Vec3::new(0.0, 0.0, -10.0), Rotation::ZERO, 1.0, 80.0).unwrap()
}

#[test]
fn segment_on_camera_axis_projects_to_center() {
    let camera = lab_camera();
    let relative = [
        camera.relative_point(Vec3::new(0.0, 0.0, 0.0)),
        camera.relative_point(Vec3::new(0.0, 0.0, 5.0)),
    ];
    assert_eq!(relative[0].z, 10.0);
    assert_eq!(relative[1].z, 15.0);

    let normalized = camera.normalize_view_volume(relative).unwrap();
    let [a, b] = clip_line(normalized).segment().unwrap();
    assert_eq!((a.x, a.y), (0.0, 0.0));
    assert_eq!((b.x, b.y), (0.0, 0.0));

    let mut surface = RecordingSurface::new();
    let mut ctx = DrawingContext::new(camera, &mut surface, 640.0, 480.0);
    assert_eq!(
        ctx.draw_line([Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 5.0)]),
        DrawOutcome::Drawn
    );
    assert_eq!(surface.segments(), vec![(Vec2::ZERO, Vec2::ZERO)]);
}

#[test]
fn segment_behind_camera_is_invisible() {
    let camera = lab_camera();
    let relative = [
        camera.relative_point(Vec3::new(0.0, 0.0, -20.0)),
        camera.relative_point(Vec3::new(0.0, 0.0, -15.0)),
    ];
    assert!(camera.normalize_view_volume(relative).is_none());

    let mut ctx = DrawingContext::new(camera, RecordingSurface::new(), 640.0, 480.0);
    assert_eq!(
        ctx.draw_line([Vec3::new(0.0, 0.0, -20.0), Vec3::new(0.0, 0.0, -15.0)]),
        DrawOutcome::BehindCamera
    );
    assert!(ctx.into_surface().calls.is_empty());
}

#[test]
fn segment_crossing_near_plane_is_cut() {
    let mut ctx = DrawingContext::new(lab_camera(), RecordingSurface::new(), 200.0, 200.0);
    // Starts behind the camera and ends in front of it, off to the side.
    let outcome = ctx.draw_line([Vec3::new(0.5, 0.0, -20.0), Vec3::new(0.5, 0.0, 10.0)]);
    assert_eq!(outcome, DrawOutcome::Drawn);

    let segments = ctx.surface().segments();
    assert_eq!(segments.len(), 1);
    let (near_end, far_end) = segments[0];
    // Cut at camera-space z == 1: x = 0.5 on the near plane.
    assert!((near_end.x - 0.5 * 100.0).abs() < 1e-3);
    assert!((far_end.x - 0.5 / 20.0 * 100.0).abs() < 1e-3);
}

#[test]
fn clip_identity_and_trivial_reject() {
    let inside = [Vec3::new(0.1, 0.2, 0.3), Vec3::new(-0.9, 0.9, -0.9)];
    assert_eq!(clip_line(inside), ClipResult::Accepted(inside));

    let above = [Vec3::new(0.0, 1.5, 0.0), Vec3::new(4.0, 2.0, -8.0)];
    assert_eq!(clip_line(above), ClipResult::Rejected);
}

#[test]
fn turtle_text_program_reaches_ten_ten() {
    let mut surface = RecordingSurface::new();
    let mut turtle = Turtle2d::new();
    turtle
        .run_script("FORWARD 10\nROTATE 90\nFORWARD 10", &mut surface)
        .unwrap();

    let pose = turtle.pose();
    assert!((pose.position.x - 10.0).abs() < 1e-4);
    assert!((pose.position.y - 10.0).abs() < 1e-4);
    assert!((pose.angle - PI / 2.0).abs() < 1e-6);
    assert_eq!(surface.segments().len(), 2);
}

#[test]
fn unknown_command_is_a_parse_error() {
    let mut turtle = Turtle2d::new();
    let err = turtle
        .run_script("FOO 1 2", &mut RecordingSurface::new())
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownCommand {
            line: 1,
            keyword: "FOO".to_string()
        }
    );
    assert!(load_program("FOO 1 2", false).is_err());
}

#[test]
fn replay_reproduces_pose_for_mixed_sequence() {
    let commands = [
        Command::Forward(3.5),
        Command::Rotate(Turn::Euler(Rotation::from_pitch_yaw_roll(0.3, 0.7, -0.2))),
        Command::PenUp,
        Command::Forward(-2.0),
        Command::Rotate(Turn::Planar(1.1)),
        Command::PenDown,
        Command::Forward(4.25),
        Command::Rotate(Turn::Euler(Rotation::from_pitch_yaw_roll(-1.0, 0.0, 2.0))),
        Command::Forward(1.0),
    ];

    let mut ctx = DrawingContext::new(lab_camera(), RecordingSurface::new(), 800.0, 600.0);
    let mut turtle = Turtle3d::new();
    for command in commands {
        turtle.run(command, &mut ctx);
    }
    let live_pose = turtle.pose();
    let live_segments = ctx.surface().segments();

    ctx.surface_mut().calls.clear();
    turtle.replay(&mut ctx);
    assert_eq!(turtle.pose(), live_pose);
    assert_eq!(ctx.surface().segments(), live_segments);
    assert_eq!(turtle.log().commands(), &commands[..]);
}

#[test]
fn replay_from_saved_log() {
    let mut ctx = DrawingContext::new(lab_camera(), RecordingSurface::new(), 800.0, 600.0);
    let mut original = Turtle3d::new();
    original
        .run_script("SETCOLOR #00ff00\nFORWARD 2\nROTATE 0,90,0\nARC 3", &mut ctx)
        .unwrap();

    let json = original.log().to_json().unwrap();
    let mut restored = Turtle3d::with_log(CommandLog::from_json(&json).unwrap());

    let mut other = DrawingContext::new(lab_camera(), RecordingSurface::new(), 800.0, 600.0);
    restored.replay(&mut other);
    assert_eq!(restored.pose(), original.pose());
    assert_eq!(other.surface().segments(), ctx.surface().segments());
    assert_eq!(other.color(), ctx.color());
}

#[test]
fn camera_property_paths_drive_rendering() {
    let mut ctx = DrawingContext::new(lab_camera(), RecordingSurface::new(), 800.0, 600.0);
    let segment = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 5.0)];

    // Turn the camera around: the segment ends up behind it.
    ctx.set_property("camera.rotation.yaw", PI).unwrap();
    assert_eq!(ctx.draw_line(segment), DrawOutcome::BehindCamera);

    ctx.transform_property("camera.rotation.yaw", |yaw| yaw - PI)
        .unwrap();
    assert_eq!(ctx.draw_line(segment), DrawOutcome::Drawn);

    assert!(ctx.set_property("camera.farDistance", 0.5).is_err());
    assert_eq!(ctx.camera.far_distance(), 80.0);
}
