//! Texture upload and the procedurally drawn sprite art.
//!
//! The avatar disc and the rocket are generated at startup instead of being
//! read from image files, so the binary has no asset directory to carry
//! around. The upload path is the same one a decoded file would take.

/// RGBA8 pixel data.
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextureData {
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            data: rgba.to_vec(),
        }
    }

    /// Portrait stand-in: a soft-edged disc shading from the ambient blue in
    /// the middle to the cyan accent at the rim.
    pub fn avatar_sprite() -> Self {
        let size = 256u32;
        let mut data = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let fx = (x as f32 + 0.5) / size as f32 * 2.0 - 1.0;
                let fy = (y as f32 + 0.5) / size as f32 * 2.0 - 1.0;
                let r = fx.hypot(fy);

                if r >= 1.0 {
                    data.extend_from_slice(&[0, 0, 0, 0]);
                    continue;
                }

                let blend = (r * r).min(1.0);
                let mut color = [
                    lerp(74.0, 0.0, blend),
                    lerp(144.0, 255.0, blend),
                    lerp(226.0, 255.0, blend),
                ];
                // Bright rim ring just inside the edge.
                if r > 0.90 {
                    color = [0.0, 255.0, 255.0];
                }

                let alpha = ((1.0 - r) * 24.0).clamp(0.0, 1.0);
                data.extend_from_slice(&[
                    color[0] as u8,
                    color[1] as u8,
                    color[2] as u8,
                    (alpha * 255.0) as u8,
                ]);
            }
        }

        Self {
            width: size,
            height: size,
            data,
        }
    }

    /// Little rocket on a transparent background, nose up, exhaust down,
    /// drawn in the scene's cyan/magenta palette.
    pub fn rocket_sprite() -> Self {
        let (width, height) = (160u32, 256u32);
        let mut data = Vec::with_capacity((width * height * 4) as usize);

        for y in 0..height {
            for x in 0..width {
                let fx = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
                let fy = (y as f32 + 0.5) / height as f32;
                data.extend_from_slice(&rocket_pixel(fx, fy));
            }
        }

        Self {
            width,
            height,
            data,
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Shape tests for the rocket art; `fx` spans -1..1, `fy` spans 0..1 top
/// to bottom.
fn rocket_pixel(fx: f32, fy: f32) -> [u8; 4] {
    let magenta = [255, 0, 110, 255];
    let cyan = [0, 255, 255, 255];

    // Nose cone.
    if (0.04..0.24).contains(&fy) && fx.abs() <= (fy - 0.04) / 0.20 * 0.34 {
        return magenta;
    }

    // Porthole, in front of the body.
    let dx = fx / 0.34;
    let dy = (fy - 0.40) / 0.07;
    if dx * dx + dy * dy <= 0.25 {
        return cyan;
    }

    // Hull with a touch of side shading.
    if (0.24..0.80).contains(&fy) && fx.abs() <= 0.34 {
        let shade = 1.0 - 0.3 * (fx.abs() / 0.34);
        return [
            (235.0 * shade) as u8,
            (240.0 * shade) as u8,
            (248.0 * shade) as u8,
            255,
        ];
    }

    // Fins flaring out near the tail.
    if (0.62..0.82).contains(&fy) {
        let reach = 0.34 + (fy - 0.62) * 1.6;
        if fx.abs() <= reach.min(0.66) && fx.abs() > 0.30 {
            return magenta;
        }
    }

    // Exhaust flame.
    if (0.80..0.98).contains(&fy) {
        let taper = 1.0 - (fy - 0.80) / 0.18;
        if fx.abs() <= 0.18 * taper {
            let core = 1.0 - (fx.abs() / 0.18).min(1.0);
            return [(core * 255.0) as u8, 255, 255, 255];
        }
    }

    [0, 0, 0, 0]
}

/// A texture plus its sampler, bound and ready for the sprite pipeline.
pub struct SpriteTexture {
    pub bind_group: wgpu::BindGroup,
}

impl SpriteTexture {
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        data: &TextureData,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: data.width,
                height: data.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            texture.as_image_copy(),
            &data.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * data.width),
                rows_per_image: Some(data.height),
            },
            wgpu::Extent3d {
                width: data.width,
                height: data.height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self { bind_group }
    }
}
