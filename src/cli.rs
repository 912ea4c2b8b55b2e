//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在图像像素中隐藏或恢复文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在图像像素中隐藏或恢复文本。\n\
                  载体可以是 PNG、JPEG、BMP 等格式，隐写结果始终保存为无损的 PNG。"
)]
pub struct Cli {
    /// 输出更详细的日志 (-v 为 info，-vv 为 debug，-vvv 为 trace)。
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在图像中隐藏一段文本，结果保存为 PNG。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 显示图像最多能隐藏多少字节的文本。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的载体图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long, required_unless_present = "message", conflicts_with = "message")]
    pub text: Option<PathBuf>,

    /// 直接在命令行中给出要隐藏的文本。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 结果图像的输出路径，默认为输入图像旁的 `doctored_<文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 同时使用 Alpha 通道嵌入数据 (恢复时必须同样指定)。
    #[arg(long)]
    pub use_alpha: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本的保存路径，默认为图像旁的 `recovered_<文件名>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 输出文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 隐藏时使用了 Alpha 通道。
    #[arg(long)]
    pub use_alpha: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的载体图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 计入 Alpha 通道。
    #[arg(long)]
    pub use_alpha: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn hide_requires_text_or_message() {
        assert!(Cli::try_parse_from(["lsb_stego", "hide", "-i", "a.png"]).is_err());
        assert!(
            Cli::try_parse_from(["lsb_stego", "hide", "-i", "a.png", "-t", "a.txt", "-m", "hi"])
                .is_err()
        );

        let cli =
            Cli::try_parse_from(["lsb_stego", "-v", "hide", "-i", "a.png", "-m", "hi"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Hide(args) => {
                assert_eq!(args.message.as_deref(), Some("hi"));
                assert!(args.text.is_none() && args.dest.is_none());
                assert!(!args.force && !args.use_alpha);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
