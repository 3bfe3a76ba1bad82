use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusValue {
    Error,
    Docked,
    Idle,
    Returning,
    Cleaning,
    Paused,
    ManualControl,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFlag {
    #[default]
    None,
    Zone,
    Segment,
    Spot,
    Target,
    Resumable,
    Mapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusStateAttribute {
    pub value: StatusValue,
    #[serde(default)]
    pub flag: StatusFlag,
}

impl StatusStateAttribute {
    pub fn new(value: StatusValue) -> Self {
        Self {
            value,
            flag: StatusFlag::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryFlag {
    #[default]
    None,
    Charging,
    Discharging,
    Charged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryStateAttribute {
    /// Charge level, 0-100.
    pub level: u8,
    #[serde(default)]
    pub flag: BatteryFlag,
}

/// Attribute classes that can be looked up in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeClass {
    Status,
    Battery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__class")]
pub enum StateAttribute {
    #[serde(rename = "StatusStateAttribute")]
    Status(StatusStateAttribute),
    #[serde(rename = "BatteryStateAttribute")]
    Battery(BatteryStateAttribute),
}

impl StateAttribute {
    pub fn class(&self) -> AttributeClass {
        match self {
            StateAttribute::Status(_) => AttributeClass::Status,
            StateAttribute::Battery(_) => AttributeClass::Battery,
        }
    }
}

/// Robot state attributes, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RobotStateStore {
    attributes: Vec<StateAttribute>,
}

impl RobotStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded the way an idle mock robot starts: docked with a full battery.
    pub fn docked() -> Self {
        let mut store = Self::new();
        store.upsert_first_matching_attribute(StateAttribute::Status(StatusStateAttribute::new(
            StatusValue::Docked,
        )));
        store.upsert_first_matching_attribute(StateAttribute::Battery(BatteryStateAttribute {
            level: 100,
            flag: BatteryFlag::Charged,
        }));
        store
    }

    pub fn attributes(&self) -> &[StateAttribute] {
        &self.attributes
    }

    pub fn first_matching_attribute(&self, class: AttributeClass) -> Option<&StateAttribute> {
        self.attributes.iter().find(|a| a.class() == class)
    }

    /// Replace the first attribute of the same class, or append if none exists.
    pub fn upsert_first_matching_attribute(&mut self, attribute: StateAttribute) {
        match self
            .attributes
            .iter_mut()
            .find(|a| a.class() == attribute.class())
        {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    pub fn status(&self) -> Option<&StatusStateAttribute> {
        match self.first_matching_attribute(AttributeClass::Status)? {
            StateAttribute::Status(status) => Some(status),
            _ => None,
        }
    }
}
