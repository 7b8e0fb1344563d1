/// 模型加载示例
///
/// 演示如何加载 OBJ 网格或 IND_HAIR 头发文件，并查看部件与绘制参数。
///
/// 运行方式：
/// ```
/// cargo run --example load_model -- assets/hair.ind
/// ```

use std::path::PathBuf;

use strand_model::geometry::{load_model, LoadOptions, VertexAttrib};
use strand_model::math::{Aabb, Vector3};

fn main() {
    // 初始化日志系统
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== strand_model 加载器示例 ===\n");

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/sphere.obj"));

    // 摆放到以原点为中心、边长为 2 的包围盒
    let target = Aabb::from_center_size(Vector3::zeros(), Vector3::repeat(2.0));
    let options = LoadOptions::default().with_placement(target);

    println!("正在加载: {}", path.display());

    let model = match load_model(&path, &options) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("\n✗ 加载失败: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n✓ 加载成功！\n");

    println!("模型信息:");
    println!("  名称: {}", model.name().unwrap_or("未命名"));
    println!("  类型: {:?}", model.model_type());
    println!("  属性: {:?}", model.attrib_code());
    println!("  顶点数: {}", model.num_verts());
    println!("  索引数: {}", model.indices().len());
    println!("  部件数: {}", model.num_parts());

    let bounds = model.bounds();
    println!(
        "  包围盒: [{:.3}, {:.3}, {:.3}] - [{:.3}, {:.3}, {:.3}]",
        bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
    );

    // 显示前几个顶点的数据
    if let Some(positions) = model.positions() {
        println!("\n顶点数据（前 {} 个）:", positions.len().min(3));
        for (i, p) in positions.iter().take(3).enumerate() {
            println!("  顶点 {}: [{:.3}, {:.3}, {:.3}]", i, p[0], p[1], p[2]);
            if let Some(t) = model.tangents().and_then(|t| t.get(i)) {
                println!("    切线: [{:.3}, {:.3}, {:.3}]", t[0], t[1], t[2]);
            }
        }
    }

    // 顶点布局
    match model.vertex_layout() {
        Ok(layout) => {
            println!("\n顶点布局:");
            for attr in layout {
                let bytes = model.attribute_bytes(attr.attrib).map_or(0, |b| b.len());
                println!(
                    "  location {}: {:?} x{} ({} 字节)",
                    attr.location, attr.attrib, attr.components, bytes
                );
            }
        }
        Err(e) => println!("\n✗ 无法构建顶点布局: {}", e),
    }

    // 部件与绘制参数
    println!("\n部件信息:");
    for i in 0..model.num_parts() {
        if let (Some(range), Some(material)) = (model.draw_range(i), model.material(i)) {
            println!("  部件 {}:", i);
            println!("    顶点范围: {} + {}", range.vstart, range.vcount);
            println!("    索引范围: {} + {}", range.istart, range.icount);
            println!("    拓扑: {:?}, 图元重启: {:?}", range.topology, range.primitive_restart);
            println!("    材质: {}", if material.name.is_empty() { "默认" } else { &material.name });
            if let Some(texture) = &material.diffuse_texture {
                println!("    漫反射贴图: {}", texture.display());
            }
        }
    }

    // 验证数据
    match model.validate() {
        Ok(()) => println!("\n✓ 数据验证通过"),
        Err(e) => println!("\n✗ 数据验证失败: {}", e),
    }

    let has_uv = model.attrib_code().contains(VertexAttrib::Uv.code());
    println!("\n包含 UV: {}", has_uv);

    println!("\n=== 示例完成 ===");
}
