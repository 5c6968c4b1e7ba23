use super::*;

#[test]
fn default_device_is_named_online_at_origin() {
    let device = DeviceRenderState::default();
    assert_eq!(device.id, "IOT-001");
    assert_eq!(device.name, "Indoor Sensor");
    assert_eq!(device.rendered_position, GridCoord::new(0.0, 0.0));
    assert!(device.is_online);
    assert!(device.last_update_ms.is_none());
}

#[test]
fn position_label_uses_one_decimal() {
    let device = DeviceRenderState { rendered_position: GridCoord::new(1.04, 2.96), ..DeviceRenderState::default() };
    assert_eq!(device.position_label(), "(1.0, 3.0)");
}

#[test]
fn status_label_follows_online_flag() {
    let mut device = DeviceRenderState::default();
    assert_eq!(device.status_label(), "Online");
    device.is_online = false;
    assert_eq!(device.status_label(), "Offline");
}

#[test]
fn readout_formats_present_and_missing_readings() {
    let device = DeviceRenderState { rendered_position: GridCoord::new(0.26, 1.0), ..DeviceRenderState::default() };
    let sample = SensorSample { x: 0.26, y: 1.0, ultrasonic1: Some(10.0), ultrasonic2: None, ultrasonic3: Some(9.5) };
    let readout = DeviceReadout::new(&device, Some(&sample));
    assert_eq!(readout.x, "0.3");
    assert_eq!(readout.y, "1.0");
    assert_eq!(readout.ultrasonic, ["10".to_owned(), "-".to_owned(), "9.5".to_owned()]);
}

#[test]
fn readout_without_sample_shows_dashes() {
    let readout = DeviceReadout::new(&DeviceRenderState::default(), None);
    assert_eq!(readout.ultrasonic, ["-", "-", "-"].map(str::to_owned));
}
