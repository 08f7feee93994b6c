// SPDX-License-Identifier: CEPL-1.0
use ash::vk;
use bitflags::bitflags;

use crate::error::VkInitResult;
use crate::query::DeviceQuery;

bitflags! {
    /// What a queue family can be used for, as far as this renderer cares.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct QueueCaps: u8 {
        const GRAPHICS = 1 << 0;
        const PRESENT = 1 << 1;
    }
}

/// Lowest family index offering each capability, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    pub fn found(&self) -> QueueCaps {
        let mut caps = QueueCaps::empty();
        caps.set(QueueCaps::GRAPHICS, self.graphics.is_some());
        caps.set(QueueCaps::PRESENT, self.present.is_some());
        caps
    }

    pub fn is_valid(&self, required: QueueCaps) -> bool {
        self.found().contains(required)
    }

    pub fn graphics_and_present(&self) -> Option<(u32, u32)> {
        Some((self.graphics?, self.present?))
    }

    /// Distinct family indices, ascending. One queue gets created per entry.
    pub fn unique(&self) -> Vec<u32> {
        let mut v: Vec<u32> = [self.graphics, self.present].into_iter().flatten().collect();
        v.sort_unstable();
        v.dedup();
        v
    }

    // first match wins; later families never overwrite
    fn record(&mut self, caps: QueueCaps, index: u32) {
        if caps.contains(QueueCaps::GRAPHICS) && self.graphics.is_none() {
            self.graphics = Some(index);
        }
        if caps.contains(QueueCaps::PRESENT) && self.present.is_none() {
            self.present = Some(index);
        }
    }
}

/// Scans the device's queue families in order and records, independently per
/// capability, the lowest family index that offers it. Families without queues
/// are skipped. Stops once every `required` capability has an index.
pub fn resolve_queue_families<Q: DeviceQuery>(
    query: &Q,
    device: Q::Device,
    required: QueueCaps,
) -> VkInitResult<QueueFamilyIndices> {
    let mut indices = QueueFamilyIndices::default();

    for (i, family) in query.queue_families(device).iter().enumerate() {
        if indices.is_valid(required) {
            break;
        }
        if family.queue_count == 0 {
            continue;
        }
        let index = i as u32;

        let mut caps = QueueCaps::empty();
        if family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
            caps |= QueueCaps::GRAPHICS;
        }
        if required.contains(QueueCaps::PRESENT)
            && indices.present.is_none()
            && query.supports_present(device, index)?
        {
            caps |= QueueCaps::PRESENT;
        }
        indices.record(caps, index);
    }

    Ok(indices)
}
