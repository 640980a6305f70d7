//! Services a provider offers and the catalog that holds them.

use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// A bookable service. `duration` is in minutes and always positive; `price`
/// is in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawService")]
pub struct Service {
    id: u64,
    name: String,
    duration: u32,
    price: u32,
}

#[derive(Deserialize)]
struct RawService {
    id: u64,
    name: String,
    duration: u32,
    #[serde(default)]
    price: u32,
}

impl TryFrom<RawService> for Service {
    type Error = BookingError;

    fn try_from(raw: RawService) -> Result<Self> {
        Service::new(raw.id, raw.name, raw.duration, raw.price)
    }
}

impl Service {
    /// # Errors
    ///
    /// Returns [`BookingError::MissingField`] for a blank name and
    /// [`BookingError::InvalidDuration`] for a zero duration.
    pub fn new(id: u64, name: impl Into<String>, duration: u32, price: u32) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(BookingError::MissingField(format!(
                "service {} has no name",
                id
            )));
        }
        if duration == 0 {
            return Err(BookingError::InvalidDuration(format!(
                "service '{}' must last at least one minute",
                name
            )));
        }
        Ok(Service {
            id,
            name,
            duration,
            price,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Duration in minutes.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn price(&self) -> u32 {
        self.price
    }
}

/// Ordered collection of services with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Service>", into = "Vec<Service>")]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl TryFrom<Vec<Service>> for ServiceCatalog {
    type Error = BookingError;

    fn try_from(services: Vec<Service>) -> Result<Self> {
        let mut catalog = ServiceCatalog::default();
        for service in services {
            catalog.add(service)?;
        }
        Ok(catalog)
    }
}

impl From<ServiceCatalog> for Vec<Service> {
    fn from(catalog: ServiceCatalog) -> Self {
        catalog.services
    }
}

impl ServiceCatalog {
    pub fn new() -> Self {
        ServiceCatalog::default()
    }

    /// # Errors
    ///
    /// Returns [`BookingError::Conflict`] if a service with the same id exists.
    pub fn add(&mut self, service: Service) -> Result<()> {
        if self.services.iter().any(|s| s.id == service.id) {
            return Err(BookingError::Conflict(format!(
                "service id {} already exists",
                service.id
            )));
        }
        self.services.push(service);
        Ok(())
    }

    /// Remove and return the service with `id`.
    pub fn remove(&mut self, id: u64) -> Result<Service> {
        let pos = self
            .services
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| service_not_found(id))?;
        Ok(self.services.remove(pos))
    }

    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] for an unknown id.
    pub fn get(&self, id: u64) -> Result<&Service> {
        self.services
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| service_not_found(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

fn service_not_found(id: u64) -> BookingError {
    BookingError::NotFound(format!("service {}", id))
}
