use common::StatusValue;

/// Simulated pose, cleaning path and last observed status of the mock robot.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotState {
    position: (f64, f64),
    heading_degrees: f64,
    /// Flattened x0, y0, x1, y1, ...
    path: Vec<f64>,
    status: StatusValue,
}

impl RobotState {
    pub fn new(position: (f64, f64), heading_degrees: f64, status: StatusValue) -> Self {
        Self {
            position,
            heading_degrees,
            path: Vec::new(),
            status,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    pub fn heading_degrees(&self) -> f64 {
        self.heading_degrees
    }

    pub fn path(&self) -> &[f64] {
        &self.path
    }

    pub fn status(&self) -> StatusValue {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: StatusValue) {
        self.status = status;
    }

    pub(crate) fn set_heading(&mut self, heading_degrees: f64) {
        self.heading_degrees = heading_degrees;
    }

    /// Move `distance` along the current heading and record the new position.
    ///
    /// 0° points along -Y in pixel space and angles grow clockwise, so 90° is +X.
    pub(crate) fn step(&mut self, distance: f64) {
        let angle = (self.heading_degrees - 90.0).to_radians();
        self.position.0 += distance * angle.cos();
        self.position.1 += distance * angle.sin();

        self.path.push(self.position.0);
        self.path.push(self.position.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn robot_at(x: f64, y: f64, heading: f64) -> RobotState {
        RobotState::new((x, y), heading, StatusValue::Docked)
    }

    #[test]
    fn test_step_heading_zero_moves_up() {
        let mut robot = robot_at(25.0, 30.0, 0.0);
        robot.step(20.0);

        let (x, y) = robot.position();
        assert!((x - 25.0).abs() < EPS);
        assert!((y - 10.0).abs() < EPS);
        assert_eq!(robot.path().len(), 2);
        assert!((robot.path()[0] - 25.0).abs() < EPS);
        assert!((robot.path()[1] - 10.0).abs() < EPS);
    }

    #[test]
    fn test_step_heading_ninety_moves_right() {
        let mut robot = robot_at(0.0, 0.0, 90.0);
        robot.step(5.0);

        let (x, y) = robot.position();
        assert!((x - 5.0).abs() < EPS);
        assert!(y.abs() < EPS);
    }

    #[test]
    fn test_step_heading_one_eighty_moves_down() {
        let mut robot = robot_at(0.0, 0.0, 180.0);
        robot.step(3.0);

        let (x, y) = robot.position();
        assert!(x.abs() < EPS);
        assert!((y - 3.0).abs() < EPS);
    }

    #[test]
    fn test_path_accumulates() {
        let mut robot = robot_at(0.0, 0.0, 90.0);
        robot.step(1.0);
        robot.set_heading(180.0);
        robot.step(1.0);

        assert_eq!(robot.path().len(), 4);
        assert!((robot.path()[2] - 1.0).abs() < EPS);
        assert!((robot.path()[3] - 1.0).abs() < EPS);
    }
}
