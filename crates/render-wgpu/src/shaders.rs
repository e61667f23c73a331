/// WGSL shader for the showcase objects: metal/rough Cook-Torrance lit by
/// an ambient light, one point light and an environment cube-map.
pub const STANDARD_SHADER: &str = r#"
const PI: f32 = 3.14159265;

struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    // rgb premultiplied by intensity
    ambient: vec4<f32>,
    light_pos: vec4<f32>,
    light_color: vec4<f32>,
};

struct Material {
    base_color: vec4<f32>,
    // x metalness, y roughness, z env intensity, w env mip count
    params: vec4<f32>,
};

struct Object {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> globals: Globals;
@group(0) @binding(1) var<uniform> material: Material;
@group(0) @binding(2) var env_map: texture_cube<f32>;
@group(0) @binding(3) var env_sampler: sampler;

@group(1) @binding(0) var<uniform> object: Object;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = object.model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = globals.view_proj * world;
    out.world_pos = world.xyz;
    out.world_normal = (object.normal * vec4<f32>(vertex.normal, 0.0)).xyz;
    return out;
}

fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let d = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    return a2 / (PI * d * d);
}

fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = r * r / 8.0;
    let gv = n_dot_v / (n_dot_v * (1.0 - k) + k);
    let gl = n_dot_l / (n_dot_l * (1.0 - k) + k);
    return gv * gl;
}

fn fresnel_schlick(cos_theta: f32, f0: vec3<f32>) -> vec3<f32> {
    return f0 + (1.0 - f0) * pow(clamp(1.0 - cos_theta, 0.0, 1.0), 5.0);
}

fn fresnel_schlick_roughness(cos_theta: f32, f0: vec3<f32>, roughness: f32) -> vec3<f32> {
    let f90 = max(vec3<f32>(1.0 - roughness), f0);
    return f0 + (f90 - f0) * pow(clamp(1.0 - cos_theta, 0.0, 1.0), 5.0);
}

// Cube-map images follow a left-handed lookup.
fn sample_env(dir: vec3<f32>, lod: f32) -> vec3<f32> {
    return textureSampleLevel(env_map, env_sampler, vec3<f32>(-dir.x, dir.y, dir.z), lod).rgb;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    var n = normalize(in.world_normal);
    if (!front) {
        n = -n;
    }
    let v = normalize(globals.camera_pos.xyz - in.world_pos);

    let albedo = material.base_color.rgb;
    let metalness = clamp(material.params.x, 0.0, 1.0);
    let roughness = clamp(material.params.y, 0.04, 1.0);
    let env_intensity = material.params.z;
    let max_lod = max(material.params.w - 1.0, 0.0);
    let f0 = mix(vec3<f32>(0.04), albedo, metalness);
    let n_dot_v = max(dot(n, v), 1e-4);

    // Point light, no distance falloff.
    let l = normalize(globals.light_pos.xyz - in.world_pos);
    let h = normalize(v + l);
    let n_dot_l = max(dot(n, l), 0.0);
    let n_dot_h = max(dot(n, h), 0.0);
    let f = fresnel_schlick(max(dot(h, v), 0.0), f0);
    let specular = distribution_ggx(n_dot_h, roughness)
        * geometry_smith(n_dot_v, n_dot_l, roughness) * f
        / max(4.0 * n_dot_v * n_dot_l, 1e-4);
    let kd = (vec3<f32>(1.0) - f) * (1.0 - metalness);
    let direct = (kd * albedo / PI + specular) * globals.light_color.rgb * n_dot_l;

    let ambient = globals.ambient.rgb * albedo * (1.0 - metalness);

    let f_env = fresnel_schlick_roughness(n_dot_v, f0, roughness);
    let r = reflect(-v, n);
    let env_specular = sample_env(r, roughness * max_lod) * f_env;
    let env_diffuse = sample_env(n, max_lod) * albedo
        * (vec3<f32>(1.0) - f_env) * (1.0 - metalness);
    let indirect = (env_specular + env_diffuse) * env_intensity;

    return vec4<f32>(direct + ambient + indirect, 1.0);
}
"#;
