use std::collections::BTreeMap;
use std::sync::Arc;

use vulkano::descriptor_set::layout::{
    DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorSetLayoutCreateInfo, DescriptorType,
};
use vulkano::device::Device;
use vulkano::shader::ShaderStages;

pub struct PipelineDescriptorSetLayouts {
    /// Set 0: per-frame data shared by all draws (camera + light).
    pub global: Arc<DescriptorSetLayout>,
}

impl PipelineDescriptorSetLayouts {
    /// `set=0,binding=0` uniform buffer (camera UBO), read by both stages.
    pub fn new(device: Arc<Device>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut bindings = BTreeMap::new();

        let mut camera_binding =
            DescriptorSetLayoutBinding::descriptor_type(DescriptorType::UniformBuffer);
        camera_binding.descriptor_count = 1;
        // The fragment stage needs the eye and light positions.
        camera_binding.stages = ShaderStages::VERTEX | ShaderStages::FRAGMENT;
        bindings.insert(0, camera_binding);

        let global = DescriptorSetLayout::new(
            device,
            DescriptorSetLayoutCreateInfo {
                bindings,
                ..Default::default()
            },
        )?;

        Ok(Self { global })
    }
}
