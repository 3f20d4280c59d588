pub mod drive_client;
pub mod shipstation_client;

pub use drive_client::{DriveApi, DriveClient};
pub use shipstation_client::{OrderSource, ShipStationClient};

#[cfg(test)]
pub use drive_client::MockDriveApi;
#[cfg(test)]
pub use shipstation_client::MockOrderSource;
